use super::{Force, jiggle};
use crate::layout::LayoutRng;
use crate::layout::types::LayoutNode;

/// Keeps nodes at least two radii apart.
///
/// Overlaps are resolved against the positions the nodes are about to move to
/// (position plus velocity). `strength` below 1 only removes part of an
/// overlap per tick, which keeps dense clusters from oscillating.
pub struct CollideForce {
	radius: f64,
	strength: f64,
}

impl CollideForce {
	/// Keeps nodes `2 * radius` apart.
	pub fn new(radius: f64, strength: f64) -> Self {
		Self { radius, strength }
	}
}

impl Force for CollideForce {
	fn name(&self) -> &'static str {
		"collide"
	}

	fn apply(&mut self, nodes: &mut [LayoutNode], _alpha: f64, rng: &mut LayoutRng) {
		let r = self.radius * 2.0;
		let r2 = r * r;
		let n = nodes.len();
		for i in 0..n {
			let xi = nodes[i].x + nodes[i].vx;
			let yi = nodes[i].y + nodes[i].vy;
			for j in (i + 1)..n {
				let mut x = xi - nodes[j].x - nodes[j].vx;
				let mut y = yi - nodes[j].y - nodes[j].vy;
				let mut l = x * x + y * y;
				if l >= r2 {
					continue;
				}
				if x == 0.0 {
					x = jiggle(rng);
					l += x * x;
				}
				if y == 0.0 {
					y = jiggle(rng);
					l += y * y;
				}
				let len = l.sqrt();
				let k = (r - len) / len * self.strength;
				// equal radii split the correction evenly
				let (x, y) = (x * k * 0.5, y * k * 0.5);
				nodes[i].vx += x;
				nodes[i].vy += y;
				nodes[j].vx -= x;
				nodes[j].vy -= y;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::forces::test_support::{node_at, rng};

	#[test]
	fn overlapping_nodes_are_pushed_apart() {
		let mut nodes = vec![node_at("a", 0.0, 0.0), node_at("b", 60.0, 0.0)];
		CollideForce::new(60.0, 1.0).apply(&mut nodes, 1.0, &mut rng());
		// 60 of overlap removed, half on each side
		assert!((nodes[0].vx + 30.0).abs() < 1e-6);
		assert!((nodes[1].vx - 30.0).abs() < 1e-6);
	}

	#[test]
	fn separated_nodes_are_untouched() {
		let mut nodes = vec![node_at("a", 0.0, 0.0), node_at("b", 200.0, 0.0)];
		CollideForce::new(60.0, 1.0).apply(&mut nodes, 1.0, &mut rng());
		assert_eq!((nodes[0].vx, nodes[1].vx), (0.0, 0.0));
	}

	#[test]
	fn strength_softens_correction() {
		let mut nodes = vec![node_at("a", 0.0, 0.0), node_at("b", 60.0, 0.0)];
		CollideForce::new(60.0, 0.5).apply(&mut nodes, 1.0, &mut rng());
		assert!((nodes[1].vx - 15.0).abs() < 1e-6);
	}
}
