//! Error type of the layout core.

/// Failures surfaced by the layout core. None of them are fatal to the host.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
	/// An operation referenced a node id that is not in the current run.
	#[error("no node with id {id:?} in the current layout")]
	NodeNotFound {
		/// The id as the caller passed it.
		id: String,
	},
	/// The persisted position cache could not be encoded or decoded.
	#[error("position cache (de)serialization failed: {0}")]
	Cache(#[from] serde_json::Error),
}

impl LayoutError {
	pub(crate) fn not_found(id: &str) -> Self {
		Self::NodeNotFound { id: id.to_string() }
	}
}

/// Result alias of the layout core.
pub type Result<T> = std::result::Result<T, LayoutError>;
