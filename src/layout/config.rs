//! Tunables of the layout engine, loadable from partial JSON.

use serde::{Deserialize, Serialize};

use super::types::Viewport;

/// Alpha used by [`Simulation::restart`](super::Simulation::restart) callers that
/// have no better value, and by drag reheating.
pub const DEFAULT_RESTART_ALPHA: f64 = 0.3;

/// Gentle reheat after a pin change or a resize.
pub const GENTLE_RESTART_ALPHA: f64 = 0.1;

/// Construction-time options of the layout engine.
///
/// Deserializes from a partial object; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	/// Nodes closer than twice this are pushed apart.
	pub collision_radius: f64,
	/// Share of an overlap resolved per tick, in `(0, 1]`.
	pub collision_strength: f64,
	/// Pull toward the centers of a node's groups.
	pub group_force_strength: f64,
	/// Share of the centroid offset removed per tick. Not alpha-scaled.
	pub center_strength: f64,
	/// Minimum spacing of throttled cache writes while ticking.
	pub cache_update_interval_ms: f64,
	/// How long a non-fixed cache hit stays pinned after initialization.
	pub transient_pin_ms: f64,
	/// Viewport width.
	pub width: f64,
	/// Viewport height.
	pub height: f64,
	/// Inset of the containment box from each viewport edge.
	pub padding: f64,
	/// The run settles once alpha drops below this.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Seed of the placement and jiggle RNG.
	pub seed: u64,
	/// Where nodes without a position start.
	pub placement: PlacementOptions,
}

impl Default for LayoutOptions {
	fn default() -> Self {
		Self {
			link_distance: 150.0,
			charge_strength: -300.0,
			collision_radius: 60.0,
			collision_strength: 0.7,
			group_force_strength: 0.1,
			center_strength: 0.05,
			cache_update_interval_ms: 300.0,
			transient_pin_ms: 500.0,
			width: 800.0,
			height: 600.0,
			padding: 50.0,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			seed: 0x5eed,
			placement: PlacementOptions::default(),
		}
	}
}

impl LayoutOptions {
	/// Current viewport.
	pub fn viewport(&self) -> Viewport {
		Viewport::new(self.width, self.height)
	}

	/// Same options with another viewport size.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	/// Same options with another RNG seed.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}
}

/// Tuning of initial placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementOptions {
	/// Half-width of the target jitter when the reference set shares a group.
	pub grouped_jitter: f64,
	/// Half-width of the target jitter for the global fallback.
	pub global_jitter: f64,
	/// Ring radius around the target when a reference set existed.
	pub near_ring_radius: f64,
	/// Ring radius when nothing was positioned yet.
	pub far_ring_radius: f64,
	/// Spread of the empty-layout target around the viewport center, as a
	/// fraction of the viewport size.
	pub fallback_spread: f64,
	/// Fraction of the placed-to-target vector given as initial velocity.
	pub velocity_factor: f64,
}

impl Default for PlacementOptions {
	fn default() -> Self {
		Self {
			grouped_jitter: 25.0,
			global_jitter: 75.0,
			near_ring_radius: 100.0,
			far_ring_radius: 200.0,
			fallback_spread: 0.5,
			velocity_factor: 0.01,
		}
	}
}
