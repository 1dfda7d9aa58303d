use super::Force;
use crate::layout::LayoutRng;
use crate::layout::types::{LayoutNode, Point, Viewport};

/// Weak pull of the whole layout toward the viewport center.
///
/// Translates every node by `strength` of the offset between the node
/// centroid and the target, so relative positions are kept. Not scaled by
/// alpha.
pub struct CenterForce {
	target: Point,
	strength: f64,
}

impl CenterForce {
	/// Pulls the centroid toward `target`.
	pub fn new(target: Point, strength: f64) -> Self {
		Self { target, strength }
	}
}

impl Force for CenterForce {
	fn name(&self) -> &'static str {
		"center"
	}

	fn apply(&mut self, nodes: &mut [LayoutNode], _alpha: f64, _rng: &mut LayoutRng) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let dx = (sx / n - self.target.x) * self.strength;
		let dy = (sy / n - self.target.y) * self.strength;
		for node in nodes.iter_mut() {
			node.x -= dx;
			node.y -= dy;
		}
	}

	fn resize(&mut self, viewport: Viewport) {
		self.target = viewport.center();
	}
}
