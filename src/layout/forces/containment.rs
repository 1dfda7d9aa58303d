use super::Force;
use crate::layout::LayoutRng;
use crate::layout::types::{LayoutNode, Viewport};

/// Velocity gained per unit of boundary penetration.
const PUSH: f64 = 0.1;
/// Applied to every velocity each tick, inside or outside the box.
const DAMPING: f64 = 0.9;

/// Soft box `[padding, width - padding] x [padding, height - padding]`.
///
/// Nodes outside are pushed back in proportion to how far out they are. It is
/// not a clamp: other forces may carry a node past the edge for a few ticks.
/// The unconditional damping also bounds runaway velocities.
pub struct ContainmentForce {
	viewport: Viewport,
	padding: f64,
}

impl ContainmentForce {
	/// Box inset `padding` from each edge of `viewport`.
	pub fn new(viewport: Viewport, padding: f64) -> Self {
		Self { viewport, padding }
	}

	fn correction(pos: f64, min: f64, max: f64) -> f64 {
		if pos < min {
			(min - pos) * PUSH
		} else if pos > max {
			(max - pos) * PUSH
		} else {
			0.0
		}
	}
}

impl Force for ContainmentForce {
	fn name(&self) -> &'static str {
		"containment"
	}

	fn apply(&mut self, nodes: &mut [LayoutNode], _alpha: f64, _rng: &mut LayoutRng) {
		let (min_x, max_x) = (self.padding, self.viewport.width - self.padding);
		let (min_y, max_y) = (self.padding, self.viewport.height - self.padding);
		for node in nodes.iter_mut() {
			node.vx += Self::correction(node.x, min_x, max_x);
			node.vy += Self::correction(node.y, min_y, max_y);
			node.vx *= DAMPING;
			node.vy *= DAMPING;
		}
	}

	fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::forces::test_support::{node_at, rng};

	fn force() -> ContainmentForce {
		ContainmentForce::new(Viewport::new(800.0, 600.0), 50.0)
	}

	#[test]
	fn pushes_back_proportionally_to_depth() {
		let mut nodes = vec![node_at("l", 30.0, 300.0), node_at("b", 400.0, 650.0)];
		force().apply(&mut nodes, 1.0, &mut rng());
		assert!((nodes[0].vx - 20.0 * PUSH * DAMPING).abs() < 1e-9);
		assert!((nodes[1].vy + 100.0 * PUSH * DAMPING).abs() < 1e-9);
	}

	#[test]
	fn damps_velocity_inside_the_box() {
		let mut nodes = vec![node_at("a", 400.0, 300.0)];
		nodes[0].vx = 10.0;
		nodes[0].vy = -10.0;
		force().apply(&mut nodes, 1.0, &mut rng());
		assert_eq!((nodes[0].vx, nodes[0].vy), (9.0, -9.0));
	}

	#[test]
	fn outside_node_converges_back_inside() {
		let mut nodes = vec![node_at("a", 1000.0, -100.0)];
		let mut force = force();
		let mut ticks = 0;
		while !(50.0..=750.0).contains(&nodes[0].x) || !(50.0..=550.0).contains(&nodes[0].y) {
			force.apply(&mut nodes, 1.0, &mut rng());
			nodes[0].x += nodes[0].vx;
			nodes[0].y += nodes[0].vy;
			ticks += 1;
			assert!(ticks < 200, "still outside after {ticks} ticks");
		}
	}
}
