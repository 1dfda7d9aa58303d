//! One-shot deferred pin releases.

/// Pending releases keyed by node id, at most one per node.
#[derive(Clone, Debug, Default)]
pub struct DeferredTasks {
	pending: Vec<(String, f64)>,
}

impl DeferredTasks {
	/// No pending releases.
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules a release of `id` at `due_ms`, replacing an earlier one.
	pub fn schedule(&mut self, id: &str, due_ms: f64) {
		self.cancel(id);
		self.pending.push((id.to_string(), due_ms));
	}

	/// Returns true if a release was pending.
	pub fn cancel(&mut self, id: &str) -> bool {
		let before = self.pending.len();
		self.pending.retain(|(pending, _)| pending != id);
		self.pending.len() != before
	}

	/// True while a release of `id` is pending.
	pub fn is_scheduled(&self, id: &str) -> bool {
		self.pending.iter().any(|(pending, _)| pending == id)
	}

	/// Number of pending releases.
	pub fn len(&self) -> usize {
		self.pending.len()
	}

	/// True when nothing is pending.
	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Removes and returns every release due at `now_ms`, earliest first.
	pub fn take_due(&mut self, now_ms: f64) -> Vec<String> {
		if self.pending.iter().all(|(_, due)| *due > now_ms) {
			return Vec::new();
		}
		let (mut due, rest): (Vec<_>, Vec<_>) =
			self.pending.drain(..).partition(|(_, due)| *due <= now_ms);
		self.pending = rest;
		due.sort_by(|a, b| a.1.total_cmp(&b.1));
		due.into_iter().map(|(id, _)| id).collect()
	}

	/// Drops every pending release without firing it.
	pub fn clear(&mut self) {
		self.pending.clear();
	}
}
