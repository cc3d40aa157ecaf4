use std::{
	hash::Hash,
	num::NonZeroUsize,
	sync::{Mutex, MutexGuard},
	time::{Duration, Instant},
};

use lru::LruCache;

use medbot_domain::ScoredDocument;

use crate::Answer;

/// Bounded LRU whose entries also expire after a time-to-live.
///
/// Expired entries are dropped lazily on lookup.
pub struct TtlCache<K, V>
where
	K: Hash + Eq,
{
	ttl: Duration,
	entries: Mutex<LruCache<K, Entry<V>>>,
}
impl<K, V> TtlCache<K, V>
where
	K: Hash + Eq,
	V: Clone,
{
	pub fn new(capacity: usize, ttl: Duration) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

		Self { ttl, entries: Mutex::new(LruCache::new(capacity)) }
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	pub fn get(&self, key: &K) -> Option<V> {
		let mut entries = self.lock();
		let expired = match entries.get(key) {
			Some(entry) if entry.expires_at > Instant::now() => return Some(entry.value.clone()),
			Some(_) => true,
			None => false,
		};

		if expired {
			entries.pop(key);
		}

		None
	}

	pub fn put(&self, key: K, value: V) {
		self.put_with_ttl(key, value, self.ttl);
	}

	pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
		let expires_at = Instant::now() + ttl;

		self.lock().put(key, Entry { value, expires_at });
	}

	pub fn clear(&self) {
		self.lock().clear();
	}

	/// Counts stored entries, including expired ones not yet evicted.
	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> MutexGuard<'_, LruCache<K, Entry<V>>> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner())
	}
}

struct Entry<V> {
	value: V,
	expires_at: Instant,
}

/// Process-wide memoization for the answer pipeline.
///
/// Built once at startup and shared through an `Arc`. Keys:
/// - `responses`: normalized query text.
/// - `searches`: enhanced retrieval query.
/// - `treatments`: normalized treatment name, valued by its raw price.
pub struct QueryCaches {
	pub responses: TtlCache<String, Answer>,
	pub searches: TtlCache<String, Vec<ScoredDocument>>,
	pub treatments: TtlCache<String, String>,
}
impl QueryCaches {
	pub fn new(cfg: &medbot_config::Cache) -> Self {
		Self {
			responses: TtlCache::new(
				cfg.response_capacity,
				Duration::from_secs(cfg.response_ttl_secs),
			),
			searches: TtlCache::new(cfg.search_capacity, Duration::from_secs(cfg.search_ttl_secs)),
			treatments: TtlCache::new(
				cfg.treatment_capacity,
				Duration::from_secs(cfg.treatment_ttl_secs),
			),
		}
	}

	pub fn clear(&self) {
		self.responses.clear();
		self.searches.clear();
		self.treatments.clear();

		tracing::info!("Query caches cleared.");
	}
}
impl Default for QueryCaches {
	fn default() -> Self {
		Self::new(&medbot_config::Cache::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expired_entries_are_evicted_on_lookup() {
		let cache = TtlCache::new(4, Duration::from_secs(60));

		cache.put_with_ttl("stale".to_string(), 1, Duration::ZERO);
		cache.put("fresh".to_string(), 2);

		assert_eq!(cache.get(&"stale".to_string()), None);
		assert_eq!(cache.get(&"fresh".to_string()), Some(2));
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn capacity_evicts_least_recently_used() {
		let cache = TtlCache::new(2, Duration::from_secs(60));

		cache.put(1, "a");
		cache.put(2, "b");
		cache.get(&1);
		cache.put(3, "c");

		assert_eq!(cache.get(&2), None);
		assert_eq!(cache.get(&1), Some("a"));
		assert_eq!(cache.get(&3), Some("c"));
	}

	#[test]
	fn clear_empties_every_cache() {
		let caches = QueryCaches::default();

		caches.treatments.put("xray".to_string(), "500".to_string());
		caches.searches.put("xray price".to_string(), Vec::new());
		caches.clear();

		assert!(caches.treatments.is_empty());
		assert!(caches.searches.is_empty());
		assert!(caches.responses.is_empty());
	}
}
