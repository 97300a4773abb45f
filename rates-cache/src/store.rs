//! The key-value store itself.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::clock::{Clock, SystemClock};

/// One cached value. TTL is fixed at insertion; entries are replaced
/// wholesale on refresh, never mutated in place.
struct CacheEntry {
    data: Arc<dyn Any + Send + Sync>,
    stored_at: std::time::Instant,
    ttl: Duration,
}

/// Process-wide in-memory cache keyed by string.
///
/// Freshness is determined solely by elapsed time since storage. Reads are
/// freshness-blind: [`MemoryCache::get`] returns whatever is stored, stale
/// or not, and [`MemoryCache::is_fresh`] answers the freshness question
/// separately. The check-then-read pair is not atomic; an entry expiring
/// between the two calls is a benign race, not a correctness problem.
///
/// Intended usage is one shared instance per process, injected into
/// whatever sits on top (see the provider in `rates-hex`).
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Creates an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache on a caller-supplied clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Returns the stored payload for `key` regardless of freshness.
    ///
    /// `None` when the key is absent, or when the stored payload is not a
    /// `T` (checked downcast; a type mismatch reads as absence).
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|entry| entry.data.downcast_ref::<T>().cloned())
    }

    /// True iff an entry exists for `key` and its TTL has not yet elapsed.
    pub fn is_fresh(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| self.clock.now().duration_since(entry.stored_at) < entry.ttl)
            .unwrap_or(false)
    }

    /// Inserts or unconditionally replaces the entry for `key`, stamping it
    /// with the current time.
    pub fn set<T: Send + Sync + 'static>(&self, key: impl Into<String>, data: T, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                data: Arc::new(data),
                stored_at: self.clock.now(),
                ttl,
            },
        );
    }

    /// Removes the entry for `key` if present; no-op otherwise.
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Count of entries currently held, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::ManualClock;

    use super::MemoryCache;

    fn cache_with_clock() -> (MemoryCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (MemoryCache::with_clock(clock.clone()), clock)
    }

    #[test]
    fn missing_key_is_absent_and_not_fresh() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get::<String>("nope"), None);
        assert!(!cache.is_fresh("nope"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn set_then_get_within_ttl() {
        let (cache, _clock) = cache_with_clock();
        cache.set("k", "value".to_string(), Duration::from_secs(60));

        assert!(cache.is_fresh("k"));
        assert_eq!(cache.get::<String>("k"), Some("value".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_entry_is_still_readable() {
        let (cache, clock) = cache_with_clock();
        cache.set("rate:USD:EUR", 0.92f64, Duration::from_secs(5 * 60));

        assert!(cache.is_fresh("rate:USD:EUR"));
        assert_eq!(cache.get::<f64>("rate:USD:EUR"), Some(0.92));

        clock.advance(Duration::from_secs(6 * 60));

        assert!(!cache.is_fresh("rate:USD:EUR"));
        // Stale, but never evicted: the payload is still there as a fallback.
        assert_eq!(cache.get::<f64>("rate:USD:EUR"), Some(0.92));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expiry_happens_exactly_after_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", 1u32, Duration::from_secs(10));

        clock.advance(Duration::from_secs(9));
        assert!(cache.is_fresh("k"));

        clock.advance(Duration::from_secs(1));
        // now - stored_at == ttl is no longer fresh (strict less-than).
        assert!(!cache.is_fresh("k"));
    }

    #[test]
    fn set_replaces_payload_and_timestamp() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", "old".to_string(), Duration::from_secs(10));
        clock.advance(Duration::from_secs(11));
        assert!(!cache.is_fresh("k"));

        cache.set("k", "new".to_string(), Duration::from_secs(10));
        assert!(cache.is_fresh("k"));
        assert_eq!(cache.get::<String>("k"), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn type_mismatch_reads_as_absence() {
        let cache = MemoryCache::new();
        cache.set("k", 42u64, Duration::from_secs(60));

        assert_eq!(cache.get::<String>("k"), None);
        assert_eq!(cache.get::<u64>("k"), Some(42));
    }

    #[test]
    fn heterogeneous_payloads_share_one_key_space() {
        let cache = MemoryCache::new();
        cache.set("a", "text".to_string(), Duration::from_secs(60));
        cache.set("b", vec![1u8, 2, 3], Duration::from_secs(60));

        assert_eq!(cache.get::<String>("a"), Some("text".to_string()));
        assert_eq!(cache.get::<Vec<u8>>("b"), Some(vec![1, 2, 3]));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn delete_and_clear() {
        let cache = MemoryCache::new();
        cache.set("a", 1u32, Duration::from_secs(60));
        cache.set("b", 2u32, Duration::from_secs(60));

        cache.delete("a");
        assert_eq!(cache.get::<u32>("a"), None);
        assert_eq!(cache.len(), 1);

        // Deleting a missing key is a no-op.
        cache.delete("a");
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_ttl_is_immediately_stale() {
        let (cache, _clock) = cache_with_clock();
        cache.set("k", 1u32, Duration::ZERO);
        assert!(!cache.is_fresh("k"));
        assert_eq!(cache.get::<u32>("k"), Some(1));
    }
}
