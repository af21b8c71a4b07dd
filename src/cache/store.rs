//! Shared, longer-lived cache tier.

use quick_cache::sync::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::StoreError;

/// Default capacity of a [`MemoryStore`] (number of entries).
pub const DEFAULT_STORE_CAPACITY: usize = 100_000;

/// Lifetime of a shared cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Kept until the store evicts it or is cleared
    #[default]
    Infinite,
    /// Expires after the given duration
    Expires(Duration),
}

/// A byte store shared between classifiers, possibly across processes.
///
/// Implementations do their own locking. Every failure is reported as a
/// [`StoreError`]; the fingerprint cache absorbs them and recomputes.
pub trait SharedStore: Send + Sync {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), StoreError>;

    /// Remove every entry.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
struct StoredValue {
    bytes: Arc<[u8]>,
    expires_at: Option<Instant>,
}

/// In-memory [`SharedStore`] bounded by entry count.
///
/// Useful to share results between several classifiers in one process, and
/// as a stand-in for an external store in tests.
pub struct MemoryStore {
    entries: Cache<String, StoredValue>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Cache::new(capacity.max(1)),
        }
    }

    /// Number of entries currently held, including expired ones not yet
    /// evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Drop the entry under `key` only if it is still the `expired` value
    /// that was read, so a concurrent `set` is never lost.
    fn evict_expired(&self, key: &str, expired: &StoredValue) {
        self.entries
            .remove_if(key, |current| Arc::ptr_eq(&current.bytes, &expired.bytes));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY)
    }
}

impl SharedStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let Some(value) = self.entries.get(key) else {
            return Ok(None);
        };
        if value.expires_at.is_some_and(|at| at <= Instant::now()) {
            self.evict_expired(key, &value);
            return Ok(None);
        }
        Ok(Some(value.bytes.to_vec()))
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), StoreError> {
        // A deadline past what `Instant` can represent never expires.
        let expires_at = match ttl {
            Ttl::Infinite => None,
            Ttl::Expires(after) => Instant::now().checked_add(after),
        };
        self.entries.insert(
            key.to_string(),
            StoredValue {
                bytes: value.into(),
                expires_at,
            },
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("len", &self.entries.len())
            .finish()
    }
}
