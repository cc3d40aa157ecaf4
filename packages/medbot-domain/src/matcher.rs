use std::{
	collections::HashSet,
	num::NonZeroUsize,
	sync::{Mutex, MutexGuard},
};

use lru::LruCache;

use crate::document::PriceMap;

pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.7;

/// Lowercases, drops everything except letters, digits, and whitespace, then collapses whitespace.
pub fn normalize_treatment_name(name: &str) -> String {
	let stripped: String = name
		.to_lowercase()
		.chars()
		.filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
		.collect();

	stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decides whether two treatment names denote the same treatment.
///
/// Names match when they are equal after normalization, when one contains the other, or when the
/// shared words cover at least `overlap_threshold` of the shorter name's words.
pub fn treatments_match(a: &str, b: &str, overlap_threshold: f32) -> bool {
	normalized_match(&normalize_treatment_name(a), &normalize_treatment_name(b), overlap_threshold)
}

fn normalized_match(a: &str, b: &str, overlap_threshold: f32) -> bool {
	if a == b {
		return true;
	}
	// An empty name would be a substring of everything.
	if a.is_empty() || b.is_empty() {
		return false;
	}
	if a.contains(b) || b.contains(a) {
		return true;
	}

	let words_a: HashSet<&str> = a.split(' ').collect();
	let words_b: HashSet<&str> = b.split(' ').collect();
	let shared = words_a.intersection(&words_b).count();
	let smaller = words_a.len().min(words_b.len());

	shared as f32 / smaller as f32 >= overlap_threshold
}

/// Memoizing front end for [`normalize_treatment_name`] and [`treatments_match`].
///
/// Both caches are bounded LRUs behind a mutex. Entries are pure functions of their keys, so a
/// miss computed twice under contention is harmless.
pub struct TreatmentMatcher {
	overlap_threshold: f32,
	normalized: Mutex<LruCache<String, String>>,
	matches: Mutex<LruCache<(String, String), bool>>,
}
impl TreatmentMatcher {
	pub fn new(cfg: &medbot_config::Matching) -> Self {
		Self {
			overlap_threshold: cfg.overlap_threshold,
			normalized: Mutex::new(LruCache::new(capacity(cfg.normalize_cache_size))),
			matches: Mutex::new(LruCache::new(capacity(cfg.match_cache_size))),
		}
	}

	pub fn overlap_threshold(&self) -> f32 {
		self.overlap_threshold
	}

	pub fn normalize(&self, name: &str) -> String {
		if let Some(hit) = lock(&self.normalized).get(name) {
			return hit.clone();
		}

		let normalized = normalize_treatment_name(name);

		lock(&self.normalized).put(name.to_string(), normalized.clone());

		normalized
	}

	pub fn matches(&self, a: &str, b: &str) -> bool {
		let key = (self.normalize(a), self.normalize(b));

		if let Some(hit) = lock(&self.matches).get(&key) {
			return *hit;
		}

		let matched = normalized_match(&key.0, &key.1, self.overlap_threshold);

		lock(&self.matches).put(key, matched);

		matched
	}

	/// Finds the price for `treatment`, preferring an exact normalized key over fuzzy matches.
	pub fn resolve<'m>(&self, treatment: &str, prices: &'m PriceMap) -> Option<(&'m str, &'m str)> {
		let normalized = self.normalize(treatment);

		if normalized.is_empty() {
			return None;
		}
		if let Some(entry) = prices.entry(&normalized) {
			return Some(entry);
		}

		prices.iter().find(|(key, _)| self.matches(&normalized, key))
	}

	pub fn clear(&self) {
		lock(&self.normalized).clear();
		lock(&self.matches).clear();
	}
}
impl Default for TreatmentMatcher {
	fn default() -> Self {
		Self::new(&medbot_config::Matching::default())
	}
}

fn capacity(size: usize) -> NonZeroUsize {
	NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}
