use web_sys::Storage;

use crate::layout::{CacheEntry, LayoutNode, PositionCache, PositionStore};

/// Position store mirrored into `localStorage` so layouts survive reloads.
///
/// Falls back to memory only when storage is unavailable (private mode,
/// non-browser targets). Write failures are logged, never raised.
pub struct BrowserPositionStore {
	key: String,
	cache: PositionCache,
}

impl BrowserPositionStore {
	/// Loads whatever was saved under `key`; a missing or corrupt entry
	/// starts empty.
	pub fn load(key: &str) -> Self {
		let cache = local_storage()
			.and_then(|s| s.get_item(key).ok().flatten())
			.and_then(|json| match PositionCache::from_json(&json) {
				Ok(cache) => Some(cache),
				Err(e) => {
					log::warn!("discarding saved positions: {e}");
					None
				}
			})
			.unwrap_or_default();
		log::debug!("loaded {} saved positions from {key}", cache.len());
		Self {
			key: key.to_string(),
			cache,
		}
	}

	fn persist(&self) {
		let Some(storage) = local_storage() else {
			return;
		};
		match self.cache.to_json() {
			Ok(json) => {
				if storage.set_item(&self.key, &json).is_err() {
					log::warn!("could not save positions to {}", self.key);
				}
			}
			Err(e) => log::warn!("could not encode positions: {e}"),
		}
	}
}

impl PositionStore for BrowserPositionStore {
	fn get(&self, id: &str) -> Option<CacheEntry> {
		self.cache.get(id)
	}

	fn set(&mut self, id: &str, entry: CacheEntry) {
		self.cache.set(id, entry);
		self.persist();
	}

	fn update_batch(&mut self, nodes: &[LayoutNode]) {
		self.cache.update_batch(nodes);
		self.persist();
	}
}

fn local_storage() -> Option<Storage> {
	if !cfg!(target_arch = "wasm32") {
		return None;
	}
	web_sys::window()?.local_storage().ok().flatten()
}
