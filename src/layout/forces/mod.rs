//! Forces applied by the simulation each tick.
//!
//! Every force nudges node velocities (the center force shifts positions) and
//! is scaled by the current alpha unless noted otherwise. [`ForceSet`] runs
//! them in a fixed order with containment last, so its damping acts on what
//! the others produced.

mod center;
mod charge;
mod cluster;
mod collide;
mod containment;
mod link;

use rand::Rng;

pub use center::CenterForce;
pub use charge::ChargeForce;
pub use cluster::ClusterForce;
pub use collide::CollideForce;
pub use containment::ContainmentForce;
pub use link::{LinkForce, ResolvedLink};

use super::LayoutRng;
use super::config::LayoutOptions;
use super::types::{GroupCenters, LayoutNode, Viewport};

/// One stage of the force pipeline.
pub trait Force {
	/// Short label for logs.
	fn name(&self) -> &'static str;

	/// Accumulates this force into node velocities for one tick.
	fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f64, rng: &mut LayoutRng);

	/// Viewport changed.
	fn resize(&mut self, _viewport: Viewport) {}
}

/// The complete pipeline of one simulation run.
pub struct ForceSet {
	/// Springs along links.
	pub link: LinkForce,
	/// All-pairs repulsion.
	pub charge: ChargeForce,
	/// Keeps the centroid at the viewport center.
	pub center: CenterForce,
	/// Overlap separation.
	pub collide: CollideForce,
	/// Pull toward group centers.
	pub cluster: ClusterForce,
	/// Soft viewport bounds.
	pub containment: ContainmentForce,
}

impl ForceSet {
	/// Builds every force from `opts` for a run of `node_count` nodes.
	pub fn new(
		opts: &LayoutOptions,
		links: &[ResolvedLink],
		node_count: usize,
		groups: GroupCenters,
	) -> Self {
		let viewport = opts.viewport();
		Self {
			link: LinkForce::new(links, node_count, opts.link_distance),
			charge: ChargeForce::new(opts.charge_strength),
			center: CenterForce::new(viewport.center(), opts.center_strength),
			collide: CollideForce::new(opts.collision_radius, opts.collision_strength),
			cluster: ClusterForce::new(groups, opts.group_force_strength),
			containment: ContainmentForce::new(viewport, opts.padding),
		}
	}

	/// Forces in application order.
	pub fn pipeline(&mut self) -> [&mut dyn Force; 6] {
		[
			&mut self.link,
			&mut self.charge,
			&mut self.center,
			&mut self.collide,
			&mut self.cluster,
			&mut self.containment,
		]
	}

	/// Runs the whole pipeline once.
	pub fn apply(&mut self, nodes: &mut [LayoutNode], alpha: f64, rng: &mut LayoutRng) {
		for force in self.pipeline() {
			force.apply(nodes, alpha, rng);
		}
	}

	/// Passes a new viewport to every force.
	pub fn resize(&mut self, viewport: Viewport) {
		for force in self.pipeline() {
			force.resize(viewport);
		}
	}
}

/// Tiny random offset separating coincident nodes.
pub(crate) fn jiggle(rng: &mut LayoutRng) -> f64 {
	(rng.r#gen::<f64>() - 0.5) * 1e-6
}

#[cfg(test)]
pub(crate) mod test_support {
	use rand::SeedableRng;

	use crate::layout::LayoutRng;
	use crate::layout::types::{GraphNode, LayoutNode};

	pub fn node_at(id: &str, x: f64, y: f64) -> LayoutNode {
		LayoutNode::from_graph_node(&GraphNode::new(id).with_position(x, y))
	}

	pub fn rng() -> LayoutRng {
		LayoutRng::seed_from_u64(1)
	}
}

#[cfg(test)]
mod tests {
	use super::test_support::{node_at, rng};
	use super::*;

	#[test]
	fn containment_runs_last() {
		let mut set = ForceSet::new(&LayoutOptions::default(), &[], 0, GroupCenters::new());
		let names: Vec<&str> = set.pipeline().iter().map(|f| f.name()).collect();
		assert_eq!(names, ["link", "charge", "center", "collide", "cluster", "containment"]);
	}

	#[test]
	fn jiggle_is_tiny() {
		let mut rng = rng();
		for _ in 0..100 {
			assert!(jiggle(&mut rng).abs() <= 5e-7);
		}
	}

	#[test]
	fn resize_reaches_containment() {
		let opts = LayoutOptions::default();
		let mut set = ForceSet::new(&opts, &[], 1, GroupCenters::new());
		set.resize(Viewport::new(2000.0, 2000.0));

		let mut nodes = vec![node_at("a", 1500.0, 1500.0)];
		set.containment.apply(&mut nodes, 1.0, &mut rng());
		assert_eq!((nodes[0].vx, nodes[0].vy), (0.0, 0.0));
	}
}
