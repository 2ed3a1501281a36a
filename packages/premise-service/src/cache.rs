use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

/// Bounded map from premise text to its embedding, evicting the least recently used entry.
///
/// Both `lookup` and `insert` count as a use. A miss only means the text has not been embedded
/// yet (or was evicted).
#[derive(Debug)]
pub struct EmbeddingCache {
	entries: Mutex<LruCache<String, Vec<f32>>>,
}
impl EmbeddingCache {
	/// A zero capacity is raised to one.
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

		Self { entries: Mutex::new(LruCache::new(capacity)) }
	}

	pub fn lookup(&self, text: &str) -> Option<Vec<f32>> {
		self.entries.lock().get(text).cloned()
	}

	pub fn insert(&self, text: String, vec: Vec<f32>) {
		self.entries.lock().put(text, vec);
	}

	/// Membership check that does not touch recency.
	pub fn contains(&self, text: &str) -> bool {
		self.entries.lock().contains(text)
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn capacity(&self) -> usize {
		self.entries.lock().cap().get()
	}
}
