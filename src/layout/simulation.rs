//! Tick-driven force simulation.
//!
//! The host calls [`Simulation::tick`] once per animation frame with a
//! monotonic clock in milliseconds. A tick fires due deferred pin releases,
//! advances the physics one step while the run is hot, writes positions to the
//! position store at most once per `cache_update_interval_ms`, and calls the
//! tick hook. When alpha cools below `alpha_min` the run stops, positions are
//! flushed regardless of the throttle, and the end hook fires.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use rand::SeedableRng;

use super::LayoutRng;
use super::cache::{CacheEntry, SharedPositionStore};
use super::config::{GENTLE_RESTART_ALPHA, LayoutOptions};
use super::forces::{ForceSet, ResolvedLink};
use super::placement::place_unpositioned;
use super::schedule::DeferredTasks;
use super::types::{GraphLink, GraphNode, GroupCenters, LayoutNode, Viewport};

/// Hook receiving the full node array.
pub type NodesHook = Box<dyn FnMut(&[LayoutNode])>;
/// Hook receiving a node id and its new fixed state.
pub type ToggleHook = Box<dyn FnMut(&str, bool)>;

/// Handle on one simulation run.
///
/// Cloneable, so hooks can capture it and stop the run from inside a tick.
/// Handles of earlier runs are detached once [`Simulation::initialize`] is
/// called again.
#[derive(Clone, Debug)]
pub struct RunHandle {
	generation: u64,
	running: Rc<Cell<bool>>,
}

impl RunHandle {
	/// Halts ticking. Idempotent.
	pub fn stop(&self) {
		self.running.set(false);
	}

	/// False once the run settled or was stopped.
	pub fn is_running(&self) -> bool {
		self.running.get()
	}

	/// Which [`Simulation::initialize`] call produced this handle.
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

/// What a call to [`Simulation::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// Not running; only deferred tasks were serviced.
	Idle,
	/// Advanced one step.
	Ticked,
	/// Advanced one step, cooled down and stopped.
	Settled,
}

/// Force-directed layout of one node/link set.
pub struct Simulation {
	pub(super) options: LayoutOptions,
	pub(super) store: SharedPositionStore,
	pub(super) nodes: Vec<LayoutNode>,
	pub(super) index: HashMap<String, usize>,
	links: Vec<ResolvedLink>,
	forces: ForceSet,
	alpha: f64,
	alpha_target: f64,
	running: Rc<Cell<bool>>,
	generation: u64,
	last_flush_ms: Option<f64>,
	pub(super) deferred: DeferredTasks,
	pub(super) dragging: Option<usize>,
	rng: LayoutRng,
	on_tick: Option<NodesHook>,
	on_end: Option<NodesHook>,
	pub(super) on_toggle_fixed: Option<ToggleHook>,
}

impl Simulation {
	/// Idle simulation with no nodes. Call [`Simulation::initialize`] to start.
	pub fn new(options: LayoutOptions, store: SharedPositionStore) -> Self {
		let forces = ForceSet::new(&options, &[], 0, GroupCenters::new());
		let rng = LayoutRng::seed_from_u64(options.seed);
		Self {
			options,
			store,
			nodes: Vec::new(),
			index: HashMap::new(),
			links: Vec::new(),
			forces,
			alpha: 0.0,
			alpha_target: 0.0,
			running: Rc::new(Cell::new(false)),
			generation: 0,
			last_flush_ms: None,
			deferred: DeferredTasks::new(),
			dragging: None,
			rng,
			on_tick: None,
			on_end: None,
			on_toggle_fixed: None,
		}
	}

	/// Called after every step with the current nodes (e.g. to re-render).
	pub fn on_tick(&mut self, hook: impl FnMut(&[LayoutNode]) + 'static) {
		self.on_tick = Some(Box::new(hook));
	}

	/// Called once when a run cools down.
	pub fn on_end(&mut self, hook: impl FnMut(&[LayoutNode]) + 'static) {
		self.on_end = Some(Box::new(hook));
	}

	/// Called whenever a node's explicit pin changes.
	pub fn on_toggle_fixed(&mut self, hook: impl FnMut(&str, bool) + 'static) {
		self.on_toggle_fixed = Some(Box::new(hook));
	}

	/// Replaces the current run with a new node/link set.
	///
	/// Nodes found in the position store start at their stored position and
	/// pinned there; entries not marked fixed are released after
	/// `transient_pin_ms`. Every other node without a position is placed near
	/// its groups. Links with an unknown endpoint are ignored.
	///
	/// The RNG is reseeded from [`LayoutOptions::seed`] on every call, so the
	/// same input always produces the same run.
	pub fn initialize(
		&mut self,
		nodes: &[GraphNode],
		links: &[GraphLink],
		groups: GroupCenters,
		now_ms: f64,
	) -> RunHandle {
		self.running.set(false);
		self.running = Rc::new(Cell::new(false));
		self.generation += 1;
		self.deferred.clear();
		self.dragging = None;
		self.last_flush_ms = None;
		self.rng = LayoutRng::seed_from_u64(self.options.seed);

		self.nodes.clear();
		self.index.clear();
		for node in nodes {
			if self.index.contains_key(&node.id) {
				log::warn!("duplicate node id {:?} ignored", node.id);
				continue;
			}
			self.index.insert(node.id.clone(), self.nodes.len());
			self.nodes.push(LayoutNode::from_graph_node(node));
		}

		let hits = self.apply_cached_positions(now_ms);
		let placed = place_unpositioned(
			&mut self.nodes,
			self.options.viewport(),
			self.options.padding,
			&self.options.placement,
			&mut self.rng,
		);

		self.links = links
			.iter()
			.filter_map(|link| {
				let resolved = self
					.index
					.get(&link.source)
					.zip(self.index.get(&link.target))
					.map(|(&source, &target)| ResolvedLink { source, target });
				if resolved.is_none() {
					log::debug!("inert link {} -> {}", link.source, link.target);
				}
				resolved
			})
			.collect();

		self.forces = ForceSet::new(&self.options, &self.links, self.nodes.len(), groups);
		self.alpha = 1.0;
		self.alpha_target = 0.0;
		self.running.set(true);

		log::info!(
			"layout run {}: {} nodes ({} cached, {} placed), {} links",
			self.generation,
			self.nodes.len(),
			hits,
			placed,
			self.links.len()
		);
		self.handle()
	}

	fn apply_cached_positions(&mut self, now_ms: f64) -> usize {
		let store = match self.store.try_borrow() {
			Ok(store) => store,
			Err(_) => {
				log::warn!("position store busy, starting without cached positions");
				return 0;
			}
		};
		let mut hits = 0;
		for node in &mut self.nodes {
			let Some(entry) = store.get(&node.id) else {
				continue;
			};
			if !(entry.x.is_finite() && entry.y.is_finite()) {
				continue;
			}
			node.x = entry.x;
			node.y = entry.y;
			node.vx = if entry.vx.is_finite() { entry.vx } else { 0.0 };
			node.vy = if entry.vy.is_finite() { entry.vy } else { 0.0 };
			node.pin();
			node.is_fixed = entry.is_fixed;
			if !entry.is_fixed {
				self.deferred
					.schedule(&node.id, now_ms + self.options.transient_pin_ms);
			}
			hits += 1;
		}
		hits
	}

	/// Handle on the current run.
	pub fn handle(&self) -> RunHandle {
		RunHandle {
			generation: self.generation,
			running: self.running.clone(),
		}
	}

	/// Advances the simulation by one frame. See the module docs.
	pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
		self.run_due_tasks(now_ms);
		if !self.running.get() {
			return TickOutcome::Idle;
		}

		self.step_once();
		log::trace!("tick alpha={:.4}", self.alpha);

		let flush_due = self
			.last_flush_ms
			.is_none_or(|last| now_ms - last >= self.options.cache_update_interval_ms);
		if flush_due {
			self.flush_cache();
			self.last_flush_ms = Some(now_ms);
		}

		if let Some(hook) = self.on_tick.as_mut() {
			hook(&self.nodes);
		}
		// the hook may have stopped the run
		if !self.running.get() {
			return TickOutcome::Ticked;
		}

		if self.alpha < self.options.alpha_min {
			self.running.set(false);
			self.flush_cache();
			self.last_flush_ms = Some(now_ms);
			log::info!("layout run {} settled", self.generation);
			if let Some(hook) = self.on_end.as_mut() {
				hook(&self.nodes);
			}
			return TickOutcome::Settled;
		}
		TickOutcome::Ticked
	}

	/// Advances the physics `iterations` steps without hooks, cache writes or
	/// deferred tasks, regardless of whether the run is active.
	pub fn step(&mut self, iterations: usize) {
		for _ in 0..iterations {
			self.step_once();
		}
	}

	fn step_once(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.options.alpha_decay;
		let alpha = self.alpha;
		self.forces.apply(&mut self.nodes, alpha, &mut self.rng);

		let keep = 1.0 - self.options.velocity_decay;
		for node in &mut self.nodes {
			let ok_x = integrate(&mut node.x, &mut node.vx, node.fx, keep);
			let ok_y = integrate(&mut node.y, &mut node.vy, node.fy, keep);
			if !(ok_x && ok_y) {
				log::warn!("non-finite velocity on {}, reset", node.id);
			}
		}
	}

	/// Fires every due deferred release. Releases skip nodes that are
	/// explicitly fixed or being dragged.
	pub fn run_due_tasks(&mut self, now_ms: f64) -> usize {
		let mut released = 0;
		for id in self.deferred.take_due(now_ms) {
			let Some(&i) = self.index.get(&id) else {
				continue;
			};
			if self.nodes[i].is_fixed || self.dragging == Some(i) {
				continue;
			}
			self.nodes[i].unpin();
			released += 1;
			log::debug!("released transient pin on {id}");
		}
		released
	}

	/// Reheats to `alpha` and resumes ticking.
	pub fn restart(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
		self.running.set(true);
		log::debug!("restart at alpha {:.3}", self.alpha);
	}

	/// Halts ticking. Idempotent.
	pub fn stop(&mut self) {
		self.running.set(false);
	}

	/// Resizes the area used by the center and containment forces, then
	/// reheats gently so nodes drift to the new bounds.
	pub fn update_size(&mut self, width: f64, height: f64) {
		self.options.width = width;
		self.options.height = height;
		self.forces.resize(self.options.viewport());
		self.restart(GENTLE_RESTART_ALPHA);
	}

	/// Replaces the cluster centers without restarting.
	pub fn set_group_centers(&mut self, centers: GroupCenters) {
		self.forces.cluster.set_centers(centers);
	}

	/// Current cluster centers.
	pub fn group_centers(&self) -> &GroupCenters {
		self.forces.cluster.centers()
	}

	/// Writes every node to the position store now.
	pub fn flush_cache(&mut self) {
		match self.store.try_borrow_mut() {
			Ok(mut store) => {
				store.update_batch(&self.nodes);
				log::debug!("flushed {} positions", self.nodes.len());
			}
			Err(_) => log::warn!("position store busy, flush skipped"),
		}
	}

	pub(super) fn write_node(&self, i: usize) {
		self.write_entry(i, CacheEntry::from_node(&self.nodes[i]));
	}

	pub(super) fn write_entry(&self, i: usize, entry: CacheEntry) {
		match self.store.try_borrow_mut() {
			Ok(mut store) => store.set(&self.nodes[i].id, entry),
			Err(_) => log::warn!("position store busy, {} not saved", self.nodes[i].id),
		}
	}

	pub(super) fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Current temperature of the run.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// See [`Simulation::set_alpha_target`].
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Alpha is pulled toward this value every tick; non-zero keeps the run hot.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	/// True while ticks advance the physics.
	pub fn is_running(&self) -> bool {
		self.running.get()
	}

	/// Live nodes in input order, duplicates removed.
	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	/// Live state of `id`.
	pub fn node(&self, id: &str) -> Option<&LayoutNode> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	/// Links whose endpoints both exist, as node indices.
	pub fn links(&self) -> &[ResolvedLink] {
		&self.links
	}

	/// Area the center and containment forces work in.
	pub fn viewport(&self) -> Viewport {
		self.options.viewport()
	}

	/// Options the run was built with, including the current size.
	pub fn options(&self) -> &LayoutOptions {
		&self.options
	}

	/// True while a transient release is pending for `id`.
	pub fn has_pending_release(&self, id: &str) -> bool {
		self.deferred.is_scheduled(id)
	}
}

/// One axis of the velocity-Verlet style update. A pinned axis snaps to the
/// pin with zero velocity. Returns false if the velocity was non-finite and
/// had to be reset.
fn integrate(pos: &mut f64, vel: &mut f64, pin: Option<f64>, keep: f64) -> bool {
	if let Some(p) = pin {
		*pos = p;
		*vel = 0.0;
		return true;
	}
	*vel *= keep;
	if !vel.is_finite() {
		*vel = 0.0;
		return false;
	}
	*pos += *vel;
	true
}
