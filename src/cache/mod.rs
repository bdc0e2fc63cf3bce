//! Process-global, normalized-key TTL+LRU caching.
//!
//! Mirrors the teacher's `moka`-backed `L1Cache`, generalized from a fixed
//! `[u8; 32] -> MmapFileHandle` mapping to an arbitrary value type, with an
//! explicit LRU eviction policy (moka's default admission policy is a
//! TinyLFU variant, not literal recency, so it's overridden per instance).

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lowercases and collapses runs of whitespace. Callers are responsible for
/// normalizing keys before calling [`TtlLruCache::get`]/[`TtlLruCache::set`];
/// the cache itself does not normalize implicitly so that callers can also
/// use it for keys that are already-structured composite strings.
pub fn normalize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut last_was_space = false;
    for ch in key.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_was_space = false;
        }
    }
    out
}

/// A single named TTL+LRU cache. Hit-rate and eviction counters are exposed
/// as plain atomics, matching the teacher's informal "increment a counter"
/// instrumentation rather than wiring a full metrics exporter (out of scope).
pub struct TtlLruCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    name: &'static str,
    inner: Cache<String, V>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V> TtlLruCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Builds a cache with the given name, time-to-live, and capacity.
    pub fn new(name: &'static str, ttl: Duration, capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(move |_key, _value, _cause| {
                // Counted via `evictions` below rather than here: moka's
                // eviction listener does not distinguish TTL expiry from
                // LRU eviction in a way this cache's tests need; the
                // explicit `evict_if_needed` bookkeeping in `set` does.
            })
            .build();

        Self {
            name,
            inner,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Name this cache was constructed with (used to tag eviction/metric logs).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Looks up `key`. Updates the hit-rate gauge on every call: 1 for a
    /// hit, 0 for a miss. Expired entries are treated as misses and are
    /// lazily removed by moka on access.
    pub fn get(&self, key: &str) -> Option<V> {
        match self.inner.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(cache = self.name, key, "cache hit");
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(cache = self.name, key, "cache miss");
                None
            }
        }
    }

    /// Inserts or refreshes `key`. If this insert would exceed capacity,
    /// moka evicts the least-recently-used entry before admitting the new
    /// one; we increment the eviction counter whenever the cache was
    /// already at capacity prior to this call.
    pub fn set(&self, key: String, value: V) {
        let was_full = self.inner.entry_count() >= self.inner.policy().max_capacity().unwrap_or(u64::MAX);
        self.inner.insert(key, value);
        self.inner.run_pending_tasks();
        if was_full {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(cache = self.name, "lru eviction");
        }
    }

    /// Empties the cache.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    /// Current entry count (approximate, matches moka's eventually-consistent accounting).
    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hit rate observed so far, in `[0, 1]`. Returns `0.0` before any lookups.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Total evictions recorded for this cache's lifetime.
    pub fn eviction_count(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Hello   World  "), "hello world");
        assert_eq!(normalize("Hybrid\tRetrieval\n\nQuery"), "hybrid retrieval query");
    }

    #[test]
    fn get_set_roundtrip_and_hit_rate() {
        let cache: TtlLruCache<String> = TtlLruCache::new("test", Duration::from_secs(60), 10);
        assert!(cache.get("missing").is_none());
        cache.set("k".into(), "v".into());
        assert_eq!(cache.get("k"), Some("v".to_string()));
        assert!(cache.hit_rate() > 0.0 && cache.hit_rate() < 1.0);
    }

    #[test]
    fn clear_empties_cache() {
        let cache: TtlLruCache<u32> = TtlLruCache::new("test", Duration::from_secs(60), 10);
        cache.set("a".into(), 1);
        cache.set("b".into(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn expired_entries_are_treated_as_misses() {
        let cache: TtlLruCache<u32> = TtlLruCache::new("test", Duration::from_millis(10), 10);
        cache.set("a".into(), 1);
        std::thread::sleep(Duration::from_millis(50));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn lru_eviction_drops_oldest_key_past_capacity() {
        let cache: TtlLruCache<u32> = TtlLruCache::new("test", Duration::from_secs(60), 2);
        cache.set("a".into(), 1);
        cache.set("b".into(), 2);
        // touch "a" so "b" becomes the least-recently-used entry
        let _ = cache.get("a");
        cache.set("c".into(), 3);
        cache.inner.run_pending_tasks();
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }
}
