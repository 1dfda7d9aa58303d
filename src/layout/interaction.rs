//! Pinning and drag gestures.
//!
//! A drag pins the node for good: releasing it leaves it fixed at the drop
//! point until [`Simulation::set_node_fixed`] unpins it.

use super::cache::CacheEntry;
use super::config::{DEFAULT_RESTART_ALPHA, GENTLE_RESTART_ALPHA};
use super::error::{LayoutError, Result};
use super::simulation::Simulation;

impl Simulation {
	/// Pins (`true`) or unpins (`false`) a node, saves it and reheats gently.
	/// Returns the resulting fixed state.
	pub fn set_node_fixed(&mut self, id: &str, fixed: bool) -> Result<bool> {
		let i = self.require(id)?;
		self.apply_fixed(i, fixed);
		self.restart(GENTLE_RESTART_ALPHA);
		Ok(fixed)
	}

	/// False for unknown ids.
	pub fn is_node_fixed(&self, id: &str) -> bool {
		self.node(id).is_some_and(|n| n.is_fixed)
	}

	/// Id of the node being dragged.
	pub fn dragging(&self) -> Option<&str> {
		self.dragging.map(|i| self.nodes[i].id.as_str())
	}

	/// Grabs a node: pins it where it is, marks it fixed and keeps the run hot
	/// until [`Simulation::drag_end`].
	pub fn drag_start(&mut self, id: &str) -> Result<()> {
		let i = self.require(id)?;
		self.nodes[i].pin();
		self.apply_fixed(i, true);
		self.dragging = Some(i);
		self.set_alpha_target(DEFAULT_RESTART_ALPHA);
		self.restart(DEFAULT_RESTART_ALPHA);
		Ok(())
	}

	/// Moves the pin of the dragged node to the pointer. Returns false if `id`
	/// is not the node being dragged.
	pub fn drag_move(&mut self, id: &str, x: f64, y: f64) -> Result<bool> {
		let i = self.require(id)?;
		if self.dragging != Some(i) || !(x.is_finite() && y.is_finite()) {
			return Ok(false);
		}
		let node = &mut self.nodes[i];
		node.fx = Some(x);
		node.fy = Some(y);
		Ok(true)
	}

	/// Drops the dragged node at its pin, clears its velocity and saves it.
	/// Returns false if `id` is not the node being dragged.
	pub fn drag_end(&mut self, id: &str) -> Result<bool> {
		let i = self.require(id)?;
		if self.dragging != Some(i) {
			return Ok(false);
		}
		self.dragging = None;
		self.set_alpha_target(0.0);

		let node = &mut self.nodes[i];
		if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
			node.x = fx;
			node.y = fy;
		}
		node.vx = 0.0;
		node.vy = 0.0;
		let entry = CacheEntry::from_node(node);
		self.write_entry(i, entry);
		log::debug!("dropped {id} at ({:.1}, {:.1})", entry.x, entry.y);
		Ok(true)
	}

	fn require(&self, id: &str) -> Result<usize> {
		match self.index_of(id) {
			Some(i) => Ok(i),
			None => Err(LayoutError::not_found(id)),
		}
	}

	/// Shared by explicit pinning and drag start: sets or clears the pin,
	/// cancels a pending transient release, saves and notifies.
	fn apply_fixed(&mut self, i: usize, fixed: bool) {
		let node = &mut self.nodes[i];
		if fixed {
			node.pin();
		} else {
			node.unpin();
		}
		node.is_fixed = fixed;
		let id = node.id.clone();

		self.deferred.cancel(&id);
		self.write_node(i);
		log::debug!("{id} {}", if fixed { "fixed" } else { "unfixed" });
		if let Some(hook) = self.on_toggle_fixed.as_mut() {
			hook(&id, fixed);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::layout::cache::{PositionCache, PositionStore, SharedPositionStore};
	use crate::layout::config::LayoutOptions;
	use crate::layout::types::{GraphNode, GroupCenters};

	fn setup() -> (Simulation, Rc<RefCell<PositionCache>>) {
		let cache = PositionCache::new().shared();
		let store: SharedPositionStore = cache.clone();
		let mut sim = Simulation::new(LayoutOptions::default(), store);
		sim.initialize(
			&[
				GraphNode::new("api").with_position(300.0, 300.0),
				GraphNode::new("db").with_position(500.0, 300.0),
			],
			&[],
			GroupCenters::new(),
			0.0,
		);
		(sim, cache)
	}

	#[test]
	fn unknown_ids_are_not_found() {
		let (mut sim, _) = setup();
		assert!(matches!(
			sim.set_node_fixed("nope", true),
			Err(LayoutError::NodeNotFound { .. })
		));
		assert!(!sim.is_node_fixed("nope"));
		assert!(sim.drag_start("nope").is_err());
	}

	#[test]
	fn fixing_pins_at_current_position_and_saves() {
		let (mut sim, cache) = setup();
		let toggled = Rc::new(RefCell::new(Vec::new()));
		let log = toggled.clone();
		sim.on_toggle_fixed(move |id, state| log.borrow_mut().push((id.to_string(), state)));

		assert!(sim.set_node_fixed("api", true).unwrap());
		let api = sim.node("api").unwrap();
		assert_eq!((api.fx, api.fy), (Some(api.x), Some(api.y)));
		assert!(sim.is_node_fixed("api"));
		assert!(cache.borrow().get("api").unwrap().is_fixed);
		assert_eq!(sim.alpha(), GENTLE_RESTART_ALPHA);

		assert!(!sim.set_node_fixed("api", false).unwrap());
		assert_eq!(sim.node("api").unwrap().fx, None);
		assert!(!cache.borrow().get("api").unwrap().is_fixed);
		assert_eq!(
			*toggled.borrow(),
			vec![("api".to_string(), true), ("api".to_string(), false)]
		);
	}

	#[test]
	fn fixed_node_survives_ticks() {
		let (mut sim, _) = setup();
		sim.set_node_fixed("db", true).unwrap();
		let at = sim.node("db").unwrap().position();
		for t in 0..100 {
			sim.tick(t as f64 * 16.0);
		}
		assert_eq!(sim.node("db").unwrap().position(), at);
	}

	#[test]
	fn drag_keeps_run_hot_and_drops_with_zero_velocity() {
		let (mut sim, cache) = setup();
		sim.drag_start("api").unwrap();
		assert_eq!(sim.dragging(), Some("api"));
		assert_eq!(sim.alpha_target(), DEFAULT_RESTART_ALPHA);
		assert!(sim.is_node_fixed("api"));

		for t in 0..400 {
			sim.tick(t as f64 * 16.0);
		}
		assert!(sim.is_running());

		assert!(sim.drag_move("api", 120.0, 80.0).unwrap());
		sim.tick(7000.0);
		assert_eq!(sim.node("api").unwrap().position().x, 120.0);

		assert!(sim.drag_end("api").unwrap());
		assert_eq!(sim.dragging(), None);
		assert_eq!(sim.alpha_target(), 0.0);
		let saved = cache.borrow().get("api").unwrap();
		assert_eq!(
			(saved.x, saved.y, saved.vx, saved.vy),
			(120.0, 80.0, 0.0, 0.0)
		);
		assert!(saved.is_fixed);
	}

	#[test]
	fn moves_for_other_nodes_are_ignored() {
		let (mut sim, _) = setup();
		sim.drag_start("api").unwrap();
		assert!(!sim.drag_move("db", 1.0, 1.0).unwrap());
		assert!(!sim.drag_end("db").unwrap());
		assert!(!sim.drag_move("api", f64::NAN, 1.0).unwrap());
		assert_eq!(sim.dragging(), Some("api"));
	}

	#[test]
	fn unfix_after_drag_resumes_motion() {
		let (mut sim, _) = setup();
		sim.drag_start("api").unwrap();
		sim.drag_move("api", 60.0, 60.0).unwrap();
		sim.drag_end("api").unwrap();

		sim.set_node_fixed("api", false).unwrap();
		sim.tick(0.0);
		sim.tick(16.0);
		// containment and the center pull move it once unpinned
		assert_ne!(sim.node("api").unwrap().position().x, 60.0);
	}
}
