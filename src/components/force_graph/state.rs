use std::collections::HashSet;

use crate::layout::{
	GraphData, GroupCenters, LayoutOptions, SharedPositionStore, Simulation, TickOutcome, Viewport,
};

pub const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];
pub const UNGROUPED_COLOR: &str = "#9aa5b1";

pub const NODE_RADIUS: f64 = 14.0;
pub const HIT_RADIUS: f64 = 20.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Everything the canvas needs between frames: the layout run plus view state.
pub struct MapState {
	pub sim: Simulation,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	group_names: Vec<String>,
	last_frame_ms: Option<f64>,
}

impl MapState {
	pub fn new(
		data: &GraphData,
		options: LayoutOptions,
		store: SharedPositionStore,
		width: f64,
		height: f64,
		now_ms: f64,
	) -> Self {
		let mut sim = Simulation::new(options.with_size(width, height), store);
		sim.on_toggle_fixed(|id, fixed| {
			log::info!("{id} {}", if fixed { "pinned" } else { "unpinned" });
		});
		sim.on_end(|nodes| log::info!("layout settled ({} systems)", nodes.len()));

		let group_names = data.group_names();
		let centers = GroupCenters::arrange(&group_names, Viewport::new(width, height));
		sim.initialize(&data.nodes, &data.links, centers, now_ms);

		Self {
			sim,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			group_names,
			last_frame_ms: None,
		}
	}

	pub fn group_names(&self) -> &[String] {
		&self.group_names
	}

	/// Fill color of a node: its first group's palette entry.
	pub fn node_color(&self, idx: usize) -> &'static str {
		self.sim.nodes()[idx]
			.groups
			.first()
			.and_then(|g| self.group_names.iter().position(|n| n == g))
			.map_or(UNGROUPED_COLOR, |i| COLORS[i % COLORS.len()])
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// last drawn wins
		self.sim.nodes().iter().rposition(|node| {
			let (dx, dy) = (node.x - gx, node.y - gy);
			(dx * dx + dy * dy).sqrt() < HIT_RADIUS
		})
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for link in self.sim.links() {
				if link.source == idx {
					self.hover.neighbors.insert(link.target);
				} else if link.target == idx {
					self.hover.neighbors.insert(link.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// One animation frame at `now_ms`.
	pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
		let dt = self
			.last_frame_ms
			.map_or(0.016, |last| ((now_ms - last) / 1000.0).clamp(0.0, 0.1));
		self.last_frame_ms = Some(now_ms);

		let outcome = self.sim.tick(now_ms);
		self.flow_time += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
		outcome
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let viewport = Viewport::new(width, height);
		self.sim
			.set_group_centers(GroupCenters::arrange(&self.group_names, viewport));
		self.sim.update_size(width, height);
	}

	/// Grabs the node under the pointer, if any.
	pub fn begin_drag(&mut self, sx: f64, sy: f64) -> bool {
		let Some(idx) = self.node_at_position(sx, sy) else {
			return false;
		};
		let id = self.sim.nodes()[idx].id.clone();
		match self.sim.drag_start(&id) {
			Ok(()) => true,
			Err(e) => {
				log::warn!("drag start: {e}");
				false
			}
		}
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(id) = self.sim.dragging().map(str::to_owned) else {
			return;
		};
		let (gx, gy) = self.screen_to_graph(sx, sy);
		if let Err(e) = self.sim.drag_move(&id, gx, gy) {
			log::warn!("drag move: {e}");
		}
	}

	pub fn end_drag(&mut self) {
		let Some(id) = self.sim.dragging().map(str::to_owned) else {
			return;
		};
		if let Err(e) = self.sim.drag_end(&id) {
			log::warn!("drag end: {e}");
		}
	}

	pub fn is_dragging(&self) -> bool {
		self.sim.dragging().is_some()
	}

	/// Flips the explicit pin of the node under the pointer.
	pub fn toggle_fixed_at(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.node_at_position(sx, sy) else {
			return;
		};
		let id = self.sim.nodes()[idx].id.clone();
		let fixed = self.sim.is_node_fixed(&id);
		if let Err(e) = self.sim.set_node_fixed(&id, !fixed) {
			log::warn!("toggle pin: {e}");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::{GraphLink, GraphNode, PositionCache};

	fn state() -> MapState {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("api")
					.with_groups(["edge"])
					.with_position(100.0, 100.0),
				GraphNode::new("db")
					.with_groups(["data"])
					.with_position(300.0, 100.0),
				GraphNode::new("cache").with_position(500.0, 100.0),
			],
			links: vec![GraphLink::new("api", "db")],
		};
		let store: SharedPositionStore = PositionCache::new().shared();
		MapState::new(&data, LayoutOptions::default(), store, 800.0, 600.0, 0.0)
	}

	#[test]
	fn hit_test_uses_view_transform() {
		let mut s = state();
		assert_eq!(s.node_at_position(102.0, 98.0), Some(0));
		s.transform = ViewTransform {
			x: 50.0,
			y: 0.0,
			k: 2.0,
		};
		assert_eq!(s.node_at_position(650.0, 200.0), Some(1));
		assert_eq!(s.node_at_position(5.0, 5.0), None);
	}

	#[test]
	fn hover_collects_linked_neighbors() {
		let mut s = state();
		s.set_hover(Some(0));
		assert!(s.is_highlighted(1));
		assert!(!s.is_highlighted(2));
	}

	#[test]
	fn colors_follow_first_group() {
		let s = state();
		assert_eq!(s.node_color(0), COLORS[0]);
		assert_eq!(s.node_color(1), COLORS[1]);
		assert_eq!(s.node_color(2), UNGROUPED_COLOR);
	}

	#[test]
	fn pointer_drag_pins_node_at_drop_point() {
		let mut s = state();
		assert!(s.begin_drag(300.0, 100.0));
		s.drag_to(420.0, 260.0);
		s.end_drag();
		assert!(!s.is_dragging());
		let db = s.sim.node("db").unwrap();
		assert_eq!((db.x, db.y), (420.0, 260.0));
		assert!(db.is_fixed);

		s.toggle_fixed_at(420.0, 260.0);
		assert!(!s.sim.is_node_fixed("db"));
	}
}
