use super::{Force, jiggle};
use crate::layout::LayoutRng;
use crate::layout::types::LayoutNode;

/// A link whose endpoints both exist, as indices into the node array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
	/// Index of the dependent node.
	pub source: usize,
	/// Index of the node it depends on.
	pub target: usize,
}

#[derive(Clone, Copy, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Spring pulling linked nodes toward `distance` apart.
///
/// A spring's stiffness is `1 / min(degree)` of its endpoints, and the pull is
/// split by degree so hubs move less than leaves.
pub struct LinkForce {
	springs: Vec<Spring>,
	distance: f64,
}

impl LinkForce {
	/// Self-links and out-of-range indices are skipped.
	pub fn new(links: &[ResolvedLink], node_count: usize, distance: f64) -> Self {
		let mut degree = vec![0usize; node_count];
		let valid = links
			.iter()
			.filter(|l| l.source != l.target && l.source < node_count && l.target < node_count);
		for link in valid.clone() {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let springs = valid
			.map(|link| {
				let (s, t) = (degree[link.source] as f64, degree[link.target] as f64);
				Spring {
					source: link.source,
					target: link.target,
					strength: 1.0 / s.min(t),
					bias: s / (s + t),
				}
			})
			.collect();
		Self { springs, distance }
	}

	/// Number of active springs.
	pub fn len(&self) -> usize {
		self.springs.len()
	}

	/// True when no link survived resolution.
	pub fn is_empty(&self) -> bool {
		self.springs.is_empty()
	}
}

impl Force for LinkForce {
	fn name(&self) -> &'static str {
		"link"
	}

	fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f64, rng: &mut LayoutRng) {
		for spring in &self.springs {
			let (s, t) = (&nodes[spring.source], &nodes[spring.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = jiggle(rng);
			}
			if y == 0.0 {
				y = jiggle(rng);
			}
			let len = (x * x + y * y).sqrt();
			let k = (len - self.distance) / len * alpha * spring.strength;
			let (x, y) = (x * k, y * k);

			let b = spring.bias;
			nodes[spring.target].vx -= x * b;
			nodes[spring.target].vy -= y * b;
			nodes[spring.source].vx += x * (1.0 - b);
			nodes[spring.source].vy += y * (1.0 - b);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::forces::test_support::{node_at, rng};

	fn link(source: usize, target: usize) -> ResolvedLink {
		ResolvedLink { source, target }
	}

	fn pair(distance_apart: f64) -> Vec<LayoutNode> {
		vec![node_at("a", 0.0, 0.0), node_at("b", distance_apart, 0.0)]
	}

	#[test]
	fn stretched_link_pulls_together() {
		let mut nodes = pair(300.0);
		let mut force = LinkForce::new(&[link(0, 1)], 2, 150.0);
		force.apply(&mut nodes, 1.0, &mut rng());
		assert!(nodes[0].vx > 0.0);
		assert!(nodes[1].vx < 0.0);
		assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-9);
	}

	#[test]
	fn compressed_link_pushes_apart() {
		let mut nodes = pair(50.0);
		let mut force = LinkForce::new(&[link(0, 1)], 2, 150.0);
		force.apply(&mut nodes, 1.0, &mut rng());
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
	}

	#[test]
	fn link_at_rest_length_is_neutral() {
		let mut nodes = pair(150.0);
		let mut force = LinkForce::new(&[link(0, 1)], 2, 150.0);
		force.apply(&mut nodes, 1.0, &mut rng());
		assert!(nodes[0].vx.abs() < 1e-9 && nodes[1].vx.abs() < 1e-9);
	}

	#[test]
	fn hub_moves_less_than_leaf() {
		let mut nodes = vec![
			node_at("hub", 0.0, 0.0),
			node_at("leaf", 300.0, 0.0),
			node_at("x", 0.0, 150.0),
			node_at("y", 0.0, -150.0),
		];
		let links = [link(0, 1), link(0, 2), link(0, 3)];
		let mut force = LinkForce::new(&links, 4, 150.0);
		force.apply(&mut nodes, 1.0, &mut rng());
		assert!(nodes[1].vx.abs() > nodes[0].vx.abs());
	}

	#[test]
	fn self_and_out_of_range_links_are_skipped() {
		let force = LinkForce::new(&[link(0, 0), link(0, 5)], 2, 150.0);
		assert!(force.is_empty());
	}

	#[test]
	fn alpha_scales_the_pull() {
		let mut hot = pair(300.0);
		let mut cool = pair(300.0);
		let links = [link(0, 1)];
		LinkForce::new(&links, 2, 150.0).apply(&mut hot, 1.0, &mut rng());
		LinkForce::new(&links, 2, 150.0).apply(&mut cool, 0.1, &mut rng());
		assert!((hot[0].vx - cool[0].vx * 10.0).abs() < 1e-9);
	}
}
