//! Layout core of the system map.
//!
//! Headless: takes nodes, links and group centers, produces positions and
//! velocities for a renderer. Nothing in here touches the DOM.
//!
//! Submodules:
//! - types: input graph, group centers, live node state
//! - cache: position store shared with the host
//! - placement: first positions for nodes the cache does not know
//! - forces: link, charge, center, collide, cluster, containment
//! - simulation: the tick loop
//! - interaction: pin/unpin and drag gestures
//! - schedule: deferred release of transient pins

pub mod cache;
pub mod config;
pub mod error;
pub mod forces;
mod interaction;
pub mod placement;
pub mod schedule;
pub mod simulation;
pub mod types;

/// RNG behind placement and jiggle; seeded from [`LayoutOptions::seed`].
pub type LayoutRng = rand_chacha::ChaCha8Rng;

pub use cache::{CacheEntry, PositionCache, PositionStore, SharedPositionStore};
pub use config::{DEFAULT_RESTART_ALPHA, GENTLE_RESTART_ALPHA, LayoutOptions, PlacementOptions};
pub use error::{LayoutError, Result};
pub use simulation::{RunHandle, Simulation, TickOutcome};
pub use types::{
	GraphData, GraphLink, GraphNode, GroupCenters, LayoutNode, Point, RawGraphNode, Viewport,
};
