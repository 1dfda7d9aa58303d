use super::Force;
use crate::layout::LayoutRng;
use crate::layout::types::{GroupCenters, LayoutNode};

/// Pulls every node toward the centers of all groups it belongs to.
///
/// Each declared group weighs `1 / n` for a node in `n` groups, so belonging
/// to more groups does not pull harder overall. Groups without a center add
/// nothing but still count toward `n`.
pub struct ClusterForce {
	centers: GroupCenters,
	strength: f64,
}

impl ClusterForce {
	/// Pull of `strength` toward `centers`.
	pub fn new(centers: GroupCenters, strength: f64) -> Self {
		Self { centers, strength }
	}

	/// Current group centers.
	pub fn centers(&self) -> &GroupCenters {
		&self.centers
	}

	/// Replaces the group centers.
	pub fn set_centers(&mut self, centers: GroupCenters) {
		self.centers = centers;
	}
}

impl Force for ClusterForce {
	fn name(&self) -> &'static str {
		"cluster"
	}

	fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f64, _rng: &mut LayoutRng) {
		if self.centers.is_empty() {
			return;
		}
		for node in nodes.iter_mut() {
			if node.groups.is_empty() {
				continue;
			}
			let k = self.strength * alpha / node.groups.len() as f64;
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for center in node.groups.iter().filter_map(|g| self.centers.get(g)) {
				dvx += (center.x - node.x) * k;
				dvy += (center.y - node.y) * k;
			}
			node.vx += dvx;
			node.vy += dvy;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::forces::test_support::{node_at, rng};
	use crate::layout::types::Point;

	fn grouped(id: &str, x: f64, y: f64, groups: &[&str]) -> LayoutNode {
		let mut node = node_at(id, x, y);
		node.groups = groups.iter().map(|g| g.to_string()).collect();
		node
	}

	fn two_centers() -> GroupCenters {
		[("left", Point::new(0.0, 0.0)), ("right", Point::new(100.0, 0.0))]
			.into_iter()
			.collect()
	}

	#[test]
	fn two_groups_pull_toward_their_midpoint() {
		let mut nodes = vec![grouped("n", 50.0, 40.0, &["left", "right"])];
		ClusterForce::new(two_centers(), 1.0).apply(&mut nodes, 1.0, &mut rng());
		// each group contributes (center - pos) / 2
		assert!(nodes[0].vx.abs() < 1e-9);
		assert!((nodes[0].vy + 40.0).abs() < 1e-9);
	}

	#[test]
	fn equal_weight_per_group() {
		let mut left = vec![grouped("n", 30.0, 0.0, &["left", "right"])];
		ClusterForce::new(two_centers(), 1.0).apply(&mut left, 1.0, &mut rng());
		// -30/2 toward left, +70/2 toward right
		assert!((left[0].vx - 20.0).abs() < 1e-9);
		// the node is pulled toward (50, 0)
		assert!(left[0].vx > 0.0);
	}

	#[test]
	fn missing_centers_still_count_toward_weight() {
		let mut nodes = vec![grouped("n", 0.0, 100.0, &["left", "ghost"])];
		ClusterForce::new(two_centers(), 1.0).apply(&mut nodes, 1.0, &mut rng());
		assert!((nodes[0].vy + 50.0).abs() < 1e-9);
	}

	#[test]
	fn unknown_groups_and_ungrouped_nodes_feel_nothing() {
		let mut nodes = vec![
			grouped("a", 10.0, 10.0, &["ghost"]),
			grouped("b", 10.0, 10.0, &[]),
		];
		ClusterForce::new(two_centers(), 1.0).apply(&mut nodes, 1.0, &mut rng());
		for n in &nodes {
			assert_eq!((n.vx, n.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn scales_with_alpha() {
		let mut nodes = vec![grouped("n", 0.0, 100.0, &["left"])];
		ClusterForce::new(two_centers(), 0.1).apply(&mut nodes, 0.5, &mut rng());
		assert!((nodes[0].vy + 5.0).abs() < 1e-9);
	}
}
