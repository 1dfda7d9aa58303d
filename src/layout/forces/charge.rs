use super::{Force, jiggle};
use crate::layout::LayoutRng;
use crate::layout::types::LayoutNode;

/// Squared distance below which the charge stops growing.
const DISTANCE_MIN2: f64 = 1.0;

/// Pairwise many-body force; negative strength repels.
///
/// Exact O(n²) evaluation. System maps stay in the hundreds of nodes, where
/// this is cheaper than building a quadtree every tick.
pub struct ChargeForce {
	strength: f64,
	deltas: Vec<(f64, f64)>,
}

impl ChargeForce {
	/// Negative `strength` repels.
	pub fn new(strength: f64) -> Self {
		Self {
			strength,
			deltas: Vec::new(),
		}
	}
}

impl Force for ChargeForce {
	fn name(&self) -> &'static str {
		"charge"
	}

	fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f64, rng: &mut LayoutRng) {
		let n = nodes.len();
		self.deltas.clear();
		self.deltas.resize(n, (0.0, 0.0));

		for i in 0..n {
			for j in (i + 1)..n {
				let mut x = nodes[j].x - nodes[i].x;
				let mut y = nodes[j].y - nodes[i].y;
				if x == 0.0 {
					x = jiggle(rng);
				}
				if y == 0.0 {
					y = jiggle(rng);
				}
				let mut l = x * x + y * y;
				if l < DISTANCE_MIN2 {
					l = (DISTANCE_MIN2 * l).sqrt();
				}
				let w = self.strength * alpha / l;
				self.deltas[i].0 += x * w;
				self.deltas[i].1 += y * w;
				self.deltas[j].0 -= x * w;
				self.deltas[j].1 -= y * w;
			}
		}

		for (node, (dx, dy)) in nodes.iter_mut().zip(&self.deltas) {
			node.vx += dx;
			node.vy += dy;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::forces::test_support::{node_at, rng};

	#[test]
	fn negative_strength_repels() {
		let mut nodes = vec![node_at("a", 0.0, 0.0), node_at("b", 10.0, 0.0)];
		ChargeForce::new(-300.0).apply(&mut nodes, 1.0, &mut rng());
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-9);
	}

	#[test]
	fn repulsion_falls_off_with_distance() {
		let mut near = vec![node_at("a", 0.0, 0.0), node_at("b", 10.0, 0.0)];
		let mut far = vec![node_at("a", 0.0, 0.0), node_at("b", 100.0, 0.0)];
		ChargeForce::new(-300.0).apply(&mut near, 1.0, &mut rng());
		ChargeForce::new(-300.0).apply(&mut far, 1.0, &mut rng());
		assert!(near[1].vx > far[1].vx);
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let mut nodes = vec![node_at("a", 5.0, 5.0), node_at("b", 5.0, 5.0)];
		ChargeForce::new(-300.0).apply(&mut nodes, 1.0, &mut rng());
		for n in &nodes {
			assert!(n.vx.is_finite() && n.vy.is_finite());
		}
	}
}
