//! Graph input types and the live node state owned by the simulation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A 2D point in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(&self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Visible area the layout is kept inside.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
	/// Width in layout units.
	pub width: f64,
	/// Height in layout units.
	pub height: f64,
}

impl Viewport {
	/// Creates a viewport.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Center of the viewport.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

/// A system as handed over by the data layer.
///
/// Group membership is always a de-duplicated, ordered list; see
/// [`RawGraphNode`] for the legacy single-group form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGraphNode")]
pub struct GraphNode {
	/// Stable identity, unique within a graph.
	pub id: String,
	/// Display label.
	pub label: Option<String>,
	/// Group names in declaration order.
	pub groups: Vec<String>,
	/// Position known to the caller, if any (e.g. a node kept from an earlier run).
	pub position: Option<Point>,
}

impl GraphNode {
	/// Node with no groups and no known position.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	/// Replaces the group list, dropping duplicates while keeping order.
	pub fn with_groups<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups = normalize_groups(None, groups.into_iter().map(Into::into).collect());
		self
	}

	/// Sets the display label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets a known starting position.
	pub fn with_position(mut self, x: f64, y: f64) -> Self {
		self.position = Some(Point::new(x, y));
		self
	}
}

/// Wire form of a node, accepting both the legacy `group` string and the
/// `groups` list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGraphNode {
	/// Node identity.
	pub id: String,
	/// Display label.
	#[serde(default)]
	pub label: Option<String>,
	/// Legacy single group.
	#[serde(default)]
	pub group: Option<String>,
	/// Group list.
	#[serde(default)]
	pub groups: Vec<String>,
	/// Known position.
	#[serde(default)]
	pub position: Option<Point>,
}

impl From<RawGraphNode> for GraphNode {
	fn from(raw: RawGraphNode) -> Self {
		Self {
			id: raw.id,
			label: raw.label,
			groups: normalize_groups(raw.group, raw.groups),
			position: raw.position,
		}
	}
}

fn normalize_groups(legacy: Option<String>, groups: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(groups.len() + 1);
	for name in legacy.into_iter().chain(groups) {
		let name = name.trim();
		if name.is_empty() || out.iter().any(|g| g == name) {
			continue;
		}
		out.push(name.to_string());
	}
	out
}

/// A dependency edge between two node ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
	/// Dependent system.
	pub source: String,
	/// System depended upon.
	pub target: String,
}

impl GraphLink {
	/// Creates a link.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// Nodes and links for one layout run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphData {
	/// Systems.
	pub nodes: Vec<GraphNode>,
	/// Dependencies.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Distinct group names in first-seen order.
	pub fn group_names(&self) -> Vec<String> {
		let mut names: Vec<String> = Vec::new();
		for group in self.nodes.iter().flat_map(|n| &n.groups) {
			if !names.contains(group) {
				names.push(group.clone());
			}
		}
		names
	}
}

/// Group name to cluster center.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupCenters(HashMap<String, Point>);

impl GroupCenters {
	/// Empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Spreads `names` evenly on an ellipse around the viewport center, using
	/// 30% of each dimension as the radius. A single group sits at the center.
	pub fn arrange(names: &[String], viewport: Viewport) -> Self {
		let center = viewport.center();
		let (rx, ry) = (viewport.width * 0.3, viewport.height * 0.3);
		let n = names.len();
		let mut centers = Self::new();
		for (i, name) in names.iter().enumerate() {
			let point = if n == 1 {
				center
			} else {
				let angle = i as f64 * std::f64::consts::TAU / n as f64;
				Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
			};
			centers.insert(name.clone(), point);
		}
		centers
	}

	/// Sets the center of `name`.
	pub fn insert(&mut self, name: impl Into<String>, center: Point) {
		self.0.insert(name.into(), center);
	}

	/// Center of `name`, if defined.
	pub fn get(&self, name: &str) -> Option<Point> {
		self.0.get(name).copied()
	}

	/// Number of groups with a center.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// True when no center is defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over `(name, center)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
		self.0.iter().map(|(k, v)| (k.as_str(), *v))
	}
}

impl<S: Into<String>> FromIterator<(S, Point)> for GroupCenters {
	fn from_iter<T: IntoIterator<Item = (S, Point)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}
}

/// Live simulation state of one node.
///
/// `x`/`y` are NaN until the node has been seeded from the cache, the caller
/// or initial placement.
#[derive(Clone, Debug)]
pub struct LayoutNode {
	/// Identity.
	pub id: String,
	/// Display label carried through for the renderer.
	pub label: Option<String>,
	/// Group names.
	pub groups: Vec<String>,
	/// Position.
	pub x: f64,
	/// Position.
	pub y: f64,
	/// Velocity.
	pub vx: f64,
	/// Velocity.
	pub vy: f64,
	/// Pin target; physics does not move the node while set.
	pub fx: Option<f64>,
	/// Pin target; physics does not move the node while set.
	pub fy: Option<f64>,
	/// Explicit user pin.
	pub is_fixed: bool,
}

impl LayoutNode {
	/// Unplaced node built from caller input.
	pub fn from_graph_node(node: &GraphNode) -> Self {
		let (x, y) = node.position.map_or((f64::NAN, f64::NAN), |p| (p.x, p.y));
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			groups: node.groups.clone(),
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			is_fixed: false,
		}
	}

	/// True once the node has a finite position.
	pub fn has_position(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	/// Current position.
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// True while a pin target is set (explicit, drag or transient).
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() && self.fy.is_some()
	}

	/// Pins the node at its current position.
	pub fn pin(&mut self) {
		self.fx = Some(self.x);
		self.fy = Some(self.y);
	}

	/// Removes the pin target.
	pub fn unpin(&mut self) {
		self.fx = None;
		self.fy = None;
	}

	/// True if the node shares at least one group with `other`.
	pub fn shares_group_with(&self, other: &LayoutNode) -> bool {
		self.groups.iter().any(|g| other.groups.contains(g))
	}
}
