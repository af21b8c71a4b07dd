//! Two-tier fingerprint cache for classification results.
//!
//! Tier A is an in-process map that is checked first and never evicts.
//! Tier B is an optional [`SharedStore`] consulted on a tier-A miss and
//! written on every computation. Both tiers are pure memoization: a missing
//! entry is recomputed, a present entry is trusted until the cache is
//! flushed.
//!
//! A flush bumps an epoch; results computed across a flush are returned
//! to their caller but never stored, so no entry outlives the flush that
//! should have removed it.

mod fingerprint;
mod store;

pub use fingerprint::Fingerprint;
pub use store::{MemoryStore, SharedStore, Ttl, DEFAULT_STORE_CAPACITY};

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result, StoreError};
use crate::options::ClassifyOptions;
use crate::result::ClassificationResult;

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Entries held in the in-process tier
    pub local_len: usize,
    /// Lookups answered by the in-process tier
    pub hits: u64,
    /// Lookups that had to compute the result
    pub misses: u64,
    /// Lookups answered by the shared tier
    pub shared_hits: u64,
}

struct LocalEntry {
    options: ClassifyOptions,
    result: Arc<ClassificationResult>,
}

/// Shared-tier value; carries the inputs so a foreign entry is detected.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    options: String,
    result: ClassificationResult,
}

/// Memoizes classification results by [`Fingerprint`].
pub struct FingerprintCache {
    local: RwLock<AHashMap<Fingerprint, LocalEntry>>,
    shared: Option<Arc<dyn SharedStore>>,
    ttl: Ttl,
    hits: AtomicU64,
    misses: AtomicU64,
    shared_hits: AtomicU64,
    /// Bumped by every flush
    epoch: AtomicU64,
    /// Held shared while publishing an entry, exclusively while flushing
    flush_gate: RwLock<()>,
}

impl FingerprintCache {
    /// Create a cache with only the in-process tier.
    pub fn new() -> Self {
        Self {
            local: RwLock::new(AHashMap::new()),
            shared: None,
            ttl: Ttl::Infinite,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            shared_hits: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
            flush_gate: RwLock::new(()),
        }
    }

    /// Create a cache backed by a shared store, writing entries that never
    /// expire.
    pub fn with_shared_store(store: Arc<dyn SharedStore>) -> Self {
        Self {
            shared: Some(store),
            ..Self::new()
        }
    }

    /// Set the lifetime of entries written to the shared store.
    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn has_shared_store(&self) -> bool {
        self.shared.is_some()
    }

    /// Return the cached result for `user_agent`, computing and storing it
    /// on a miss.
    ///
    /// Concurrent misses for the same user agent may compute twice; the
    /// last write wins. A result whose computation overlapped a
    /// [`flush`](Self::flush) is returned but not cached. An in-process entry holding a different user agent
    /// or option set under the same fingerprint is reported as
    /// [`Error::FingerprintCollision`]. Shared-store faults and foreign
    /// shared entries are logged and answered by computing.
    pub fn get_or_compute<F>(
        &self,
        user_agent: &str,
        options: &ClassifyOptions,
        compute: F,
    ) -> Result<Arc<ClassificationResult>>
    where
        F: FnOnce() -> ClassificationResult,
    {
        let epoch = self.epoch.load(Ordering::Acquire);
        let fingerprint = Fingerprint::new(user_agent, options);

        if let Some(entry) = self.local.read().get(&fingerprint) {
            if entry.result.user_agent != user_agent || entry.options != *options {
                log::error!(
                    "Fingerprint {} holds {:?}, requested {:?}",
                    fingerprint,
                    entry.result.user_agent,
                    user_agent
                );
                return Err(Error::FingerprintCollision {
                    cached: entry.result.user_agent.clone(),
                    requested: user_agent.to_string(),
                });
            }
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&entry.result));
        }

        let key = fingerprint.storage_key();
        let mut shared_writable = true;
        if let Some(store) = &self.shared {
            match self.lookup_shared(store.as_ref(), &key, user_agent, options) {
                SharedLookup::Hit(result) => {
                    self.shared_hits.fetch_add(1, Ordering::Relaxed);
                    let result = Arc::new(result);
                    self.publish(epoch, fingerprint, options, &result, None);
                    return Ok(result);
                }
                SharedLookup::Foreign => shared_writable = false,
                SharedLookup::Miss => {}
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!("Cache miss for {}", fingerprint);
        let result = Arc::new(compute());
        let shared_key = shared_writable.then_some(key.as_str());
        self.publish(epoch, fingerprint, options, &result, shared_key);
        Ok(result)
    }

    fn lookup_shared(
        &self,
        store: &dyn SharedStore,
        key: &str,
        user_agent: &str,
        options: &ClassifyOptions,
    ) -> SharedLookup {
        let bytes = match store.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return SharedLookup::Miss,
            Err(e) => {
                log::warn!("Shared cache lookup for {} failed: {}", key, e);
                return SharedLookup::Miss;
            }
        };

        match serde_json::from_slice::<StoredEntry>(&bytes).map_err(StoreError::Corrupt) {
            Ok(entry) if entry.result.user_agent == user_agent && entry.options == options.tag() => {
                SharedLookup::Hit(entry.result)
            }
            Ok(entry) => {
                log::error!(
                    "Shared cache entry {} holds {:?}, requested {:?}",
                    key,
                    entry.result.user_agent,
                    user_agent
                );
                SharedLookup::Foreign
            }
            Err(e) => {
                log::warn!("Discarding shared cache entry {}: {}", key, e);
                SharedLookup::Miss
            }
        }
    }

    fn store_shared(
        &self,
        store: &dyn SharedStore,
        key: &str,
        options: &ClassifyOptions,
        result: &ClassificationResult,
    ) {
        let entry = StoredEntry {
            options: options.tag(),
            result: result.clone(),
        };
        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to encode cache entry {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = store.set(key, bytes, self.ttl) {
            log::warn!("Shared cache write for {} failed: {}", key, e);
        }
    }

    /// Store a result in the local tier, and in the shared tier when
    /// `shared_key` is set, unless a flush happened since `epoch`.
    fn publish(
        &self,
        epoch: u64,
        fingerprint: Fingerprint,
        options: &ClassifyOptions,
        result: &Arc<ClassificationResult>,
        shared_key: Option<&str>,
    ) {
        let _gate = self.flush_gate.read();
        if self.epoch.load(Ordering::Acquire) != epoch {
            log::debug!("Not caching {}: flushed while computing", fingerprint);
            return;
        }

        self.local.write().insert(
            fingerprint,
            LocalEntry {
                options: *options,
                result: Arc::clone(result),
            },
        );
        if let (Some(store), Some(key)) = (&self.shared, shared_key) {
            self.store_shared(store.as_ref(), key, options, result);
        }
    }

    /// Drop every entry from both tiers.
    ///
    /// The in-process tier is always cleared; a shared-store failure is
    /// returned afterwards.
    pub fn flush(&self) -> Result<()> {
        let _gate = self.flush_gate.write();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let dropped = {
            let mut local = self.local.write();
            let len = local.len();
            local.clear();
            len
        };
        log::debug!("Flushed {} in-process cache entries", dropped);

        if let Some(store) = &self.shared {
            store.clear()?;
        }
        Ok(())
    }

    /// Number of entries in the in-process tier.
    pub fn len(&self) -> usize {
        self.local.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            local_len: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            shared_hits: self.shared_hits.load(Ordering::Relaxed),
        }
    }
}

impl Default for FingerprintCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FingerprintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintCache")
            .field("stats", &self.stats())
            .field("shared", &self.shared.is_some())
            .field("ttl", &self.ttl)
            .finish()
    }
}

enum SharedLookup {
    Hit(ClassificationResult),
    /// An entry for different inputs sits under this key
    Foreign,
    Miss,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::VersionTruncation;
    use std::sync::atomic::AtomicUsize;

    fn computed(ua: &str) -> ClassificationResult {
        ClassificationResult::unknown(ua)
    }

    struct FailingStore;

    impl SharedStore for FailingStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Ttl) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        fn clear(&self) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[test]
    fn test_local_hit() {
        let cache = FingerprintCache::new();
        let options = ClassifyOptions::default();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            computed("ua")
        };

        let first = cache.get_or_compute("ua", &options, compute).unwrap();
        let second = cache
            .get_or_compute("ua", &options, || panic!("must be served from cache"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.local_len, 1);
    }

    #[test]
    fn test_cached_value_is_authoritative() {
        let cache = FingerprintCache::new();
        let options = ClassifyOptions::default();
        let mut first = computed("ua");
        first.touch_enabled = true;
        cache.get_or_compute("ua", &options, || first).unwrap();

        let again = cache.get_or_compute("ua", &options, || computed("ua")).unwrap();
        assert!(again.touch_enabled);
    }

    #[test]
    fn test_options_are_separate_entries() {
        let cache = FingerprintCache::new();
        let plain = ClassifyOptions::default();
        let major = ClassifyOptions::with_truncation(VersionTruncation::Major);
        cache.get_or_compute("ua", &plain, || computed("ua")).unwrap();
        cache.get_or_compute("ua", &major, || computed("ua")).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_local_collision_detected() {
        let cache = FingerprintCache::new();
        let options = ClassifyOptions::default();
        // A compute function returning a result for another UA simulates
        // two inputs sharing an entry.
        cache.get_or_compute("a", &options, || computed("b")).unwrap();
        match cache.get_or_compute("a", &options, || computed("a")) {
            Err(Error::FingerprintCollision { cached, requested }) => {
                assert_eq!(cached, "b");
                assert_eq!(requested, "a");
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_tier_survives_new_local_tier() {
        let store: Arc<dyn SharedStore> = Arc::new(MemoryStore::new(64));
        let options = ClassifyOptions::default();

        let first = FingerprintCache::with_shared_store(Arc::clone(&store));
        first.get_or_compute("ua", &options, || computed("ua")).unwrap();

        let second = FingerprintCache::with_shared_store(Arc::clone(&store));
        let result = second
            .get_or_compute("ua", &options, || panic!("must be served from the shared tier"))
            .unwrap();
        assert_eq!(result.user_agent, "ua");
        assert_eq!(second.stats().shared_hits, 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_corrupt_shared_entry_recomputed() {
        let store = Arc::new(MemoryStore::new(64));
        let options = ClassifyOptions::default();
        let key = Fingerprint::new("ua", &options).storage_key();
        store.set(&key, b"not json".to_vec(), Ttl::Infinite).unwrap();

        let cache = FingerprintCache::with_shared_store(store.clone());
        let result = cache.get_or_compute("ua", &options, || computed("ua")).unwrap();
        assert_eq!(result.user_agent, "ua");
        assert_eq!(cache.stats().misses, 1);

        // The fresh entry replaced the corrupt one.
        let bytes = store.get(&key).unwrap().unwrap();
        assert!(serde_json::from_slice::<StoredEntry>(&bytes).is_ok());
    }

    #[test]
    fn test_foreign_shared_entry_not_overwritten() {
        let store = Arc::new(MemoryStore::new(64));
        let options = ClassifyOptions::default();
        let key = Fingerprint::new("ua", &options).storage_key();
        let foreign = serde_json::to_vec(&StoredEntry {
            options: options.tag(),
            result: computed("other"),
        })
        .unwrap();
        store.set(&key, foreign.clone(), Ttl::Infinite).unwrap();

        let cache = FingerprintCache::with_shared_store(store.clone());
        let result = cache.get_or_compute("ua", &options, || computed("ua")).unwrap();
        assert_eq!(result.user_agent, "ua");
        assert_eq!(store.get(&key).unwrap().unwrap(), foreign);
    }

    #[test]
    fn test_unavailable_store_falls_back() {
        let cache = FingerprintCache::with_shared_store(Arc::new(FailingStore));
        let options = ClassifyOptions::default();
        let result = cache.get_or_compute("ua", &options, || computed("ua")).unwrap();
        assert_eq!(result.user_agent, "ua");
        assert!(cache.get_or_compute("ua", &options, || computed("ua")).is_ok());
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_flush() {
        let store = Arc::new(MemoryStore::new(64));
        let cache = FingerprintCache::with_shared_store(store.clone());
        let options = ClassifyOptions::default();
        cache.get_or_compute("ua", &options, || computed("ua")).unwrap();
        assert!(!store.is_empty());

        cache.flush().unwrap();
        assert!(cache.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_flush_during_compute_not_cached() {
        let store = Arc::new(MemoryStore::new(64));
        let cache = FingerprintCache::with_shared_store(store.clone());
        let options = ClassifyOptions::default();

        let result = cache
            .get_or_compute("ua", &options, || {
                cache.flush().unwrap();
                computed("ua")
            })
            .unwrap();
        assert_eq!(result.user_agent, "ua");
        assert!(cache.is_empty());
        assert!(store.is_empty());

        // Later computations are cached again.
        cache.get_or_compute("ua", &options, || computed("ua")).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_flush_reports_store_failure() {
        let cache = FingerprintCache::with_shared_store(Arc::new(FailingStore));
        let options = ClassifyOptions::default();
        cache.get_or_compute("ua", &options, || computed("ua")).unwrap();

        assert!(matches!(cache.flush(), Err(Error::CacheStore(_))));
        assert!(cache.is_empty());
    }
}
