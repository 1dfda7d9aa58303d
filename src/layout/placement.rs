//! Initial placement of nodes that have no position yet.
//!
//! Unplaced nodes start on a ring around the centroid of the already placed
//! nodes they share a group with, falling back to all placed nodes and then to
//! the viewport center. A small velocity toward the ring center makes them
//! drift in instead of jumping. Nodes placed with no reference at all are kept
//! inside the containment box so a first layout always starts on screen.

use std::f64::consts::TAU;

use rand::Rng;

use super::LayoutRng;
use super::config::PlacementOptions;
use super::types::{LayoutNode, Point, Viewport};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Reference {
	SharedGroup,
	AllPlaced,
	Nothing,
}

/// Seeds position and velocity of every node without a finite position.
/// Placed nodes are left untouched. Returns the number of nodes placed.
///
/// `padding` is the inset of the containment box, see
/// [`ContainmentForce`](super::forces::ContainmentForce).
pub fn place_unpositioned(
	nodes: &mut [LayoutNode],
	viewport: Viewport,
	padding: f64,
	opts: &PlacementOptions,
	rng: &mut LayoutRng,
) -> usize {
	let (positioned, unpositioned): (Vec<usize>, Vec<usize>) =
		(0..nodes.len()).partition(|&i| nodes[i].has_position());
	if unpositioned.is_empty() {
		return 0;
	}

	let all_placed = centroid(positioned.iter().map(|&j| nodes[j].position()));

	for &i in &unpositioned {
		let grouped = centroid(
			positioned
				.iter()
				.filter(|&&j| nodes[i].shares_group_with(&nodes[j]))
				.map(|&j| nodes[j].position()),
		);

		let (anchor, reference) = match (grouped, all_placed) {
			(Some(c), _) => (c, Reference::SharedGroup),
			(None, Some(c)) => (c, Reference::AllPlaced),
			(None, None) => (fallback_anchor(viewport, opts, rng), Reference::Nothing),
		};
		let jitter = match reference {
			Reference::SharedGroup => opts.grouped_jitter,
			_ => opts.global_jitter,
		};
		let ring = match reference {
			Reference::Nothing => opts.far_ring_radius,
			_ => opts.near_ring_radius,
		};

		let target = Point::new(
			anchor.x + spread(rng, jitter),
			anchor.y + spread(rng, jitter),
		);
		let angle = rng.gen_range(0.0..TAU);

		let mut x = target.x + ring * angle.cos();
		let mut y = target.y + ring * angle.sin();
		if reference == Reference::Nothing {
			x = inset(x, padding, viewport.width - padding);
			y = inset(y, padding, viewport.height - padding);
		}

		let node = &mut nodes[i];
		node.x = x;
		node.y = y;
		node.vx = (target.x - node.x) * opts.velocity_factor;
		node.vy = (target.y - node.y) * opts.velocity_factor;
		log::trace!("placed {} near {:?} ({:?})", node.id, target, reference);
	}

	unpositioned.len()
}

fn centroid(points: impl Iterator<Item = Point>) -> Option<Point> {
	let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
	for p in points {
		sx += p.x;
		sy += p.y;
		n += 1;
	}
	(n > 0).then(|| Point::new(sx / n as f64, sy / n as f64))
}

fn fallback_anchor(viewport: Viewport, opts: &PlacementOptions, rng: &mut LayoutRng) -> Point {
	let center = viewport.center();
	Point::new(
		center.x + spread(rng, viewport.width * opts.fallback_spread / 2.0),
		center.y + spread(rng, viewport.height * opts.fallback_spread / 2.0),
	)
}

/// Clamps into `[min, max]`; a box too small to hold anything collapses to
/// its midpoint.
fn inset(v: f64, min: f64, max: f64) -> f64 {
	if min > max {
		(min + max) / 2.0
	} else {
		v.clamp(min, max)
	}
}

/// Uniform sample in `[-half, half]`.
fn spread(rng: &mut LayoutRng, half: f64) -> f64 {
	if half > 0.0 {
		rng.gen_range(-half..=half)
	} else {
		0.0
	}
}
