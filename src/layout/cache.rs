//! Last-known node positions, kept across layout runs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::types::LayoutNode;

/// Cached state of one node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Explicitly pinned by the user; survives reloads.
	pub is_fixed: bool,
}

impl CacheEntry {
	/// Snapshot of a live node.
	pub fn from_node(node: &LayoutNode) -> Self {
		Self {
			x: node.x,
			y: node.y,
			vx: node.vx,
			vy: node.vy,
			is_fixed: node.is_fixed,
		}
	}

	fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
	}
}

/// Storage the simulation reads seeds from and writes positions to.
///
/// Writes are last-write-wins; no eviction is implied.
pub trait PositionStore {
	/// Saved state of `id`, if any.
	fn get(&self, id: &str) -> Option<CacheEntry>;
	/// Replaces the saved state of `id`.
	fn set(&mut self, id: &str, entry: CacheEntry);

	/// Overwrites the entry of every node with its current state. Nodes without
	/// a finite position are skipped.
	fn update_batch(&mut self, nodes: &[LayoutNode]) {
		for node in nodes {
			let entry = CacheEntry::from_node(node);
			if entry.is_finite() {
				self.set(&node.id, entry);
			}
		}
	}
}

/// Store shared between a simulation and its host.
pub type SharedPositionStore = Rc<RefCell<dyn PositionStore>>;

/// In-memory position store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionCache {
	entries: HashMap<String, CacheEntry>,
}

impl PositionCache {
	/// Empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps the cache for sharing with a [`Simulation`](super::Simulation).
	pub fn shared(self) -> Rc<RefCell<Self>> {
		Rc::new(RefCell::new(self))
	}

	/// Number of saved nodes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when nothing is saved.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Forgets `id`, returning what was saved.
	pub fn remove(&mut self, id: &str) -> Option<CacheEntry> {
		self.entries.remove(id)
	}

	/// Saved entries in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Serializes to `{ "<id>": { "x", "y", "vx", "vy", "isFixed" } }`.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Parses the format written by [`PositionCache::to_json`].
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

impl PositionStore for PositionCache {
	fn get(&self, id: &str) -> Option<CacheEntry> {
		self.entries.get(id).copied()
	}

	fn set(&mut self, id: &str, entry: CacheEntry) {
		self.entries.insert(id.to_string(), entry);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::layout::types::GraphNode;

	fn entry(x: f64, y: f64, is_fixed: bool) -> CacheEntry {
		CacheEntry {
			x,
			y,
			vx: 0.5,
			vy: -0.5,
			is_fixed,
		}
	}

	#[test]
	fn set_then_get_returns_same_entry() {
		let mut cache = PositionCache::new();
		cache.set("billing", entry(10.0, 20.0, true));
		assert_eq!(cache.get("billing"), Some(entry(10.0, 20.0, true)));
		assert_eq!(cache.get("missing"), None);
	}

	#[test]
	fn later_write_wins() {
		let mut cache = PositionCache::new();
		cache.set("a", entry(1.0, 1.0, false));
		cache.set("a", entry(2.0, 3.0, true));
		assert_eq!(cache.get("a"), Some(entry(2.0, 3.0, true)));
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn update_batch_overwrites_every_node() {
		let mut cache = PositionCache::new();
		cache.set("a", entry(0.0, 0.0, true));

		let mut a = LayoutNode::from_graph_node(&GraphNode::new("a").with_position(5.0, 6.0));
		a.vx = 1.0;
		let b = LayoutNode::from_graph_node(&GraphNode::new("b").with_position(7.0, 8.0));
		cache.update_batch(&[a, b]);

		assert_eq!(
			cache.get("a"),
			Some(CacheEntry {
				x: 5.0,
				y: 6.0,
				vx: 1.0,
				vy: 0.0,
				is_fixed: false,
			})
		);
		assert_eq!(cache.get("b").map(|e| (e.x, e.y)), Some((7.0, 8.0)));
	}

	#[test]
	fn update_batch_skips_unplaced_nodes() {
		let mut cache = PositionCache::new();
		cache.update_batch(&[LayoutNode::from_graph_node(&GraphNode::new("ghost"))]);
		assert!(cache.is_empty());
	}

	#[test]
	fn json_uses_camel_case_fixed_flag() {
		let mut cache = PositionCache::new();
		cache.set("a", entry(1.0, 2.0, true));
		let json = cache.to_json().unwrap();
		assert!(json.contains("\"isFixed\":true"), "{json}");
		assert_eq!(PositionCache::from_json(&json).unwrap(), cache);
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(PositionCache::from_json("{\"a\": 3}").is_err());
	}
}
