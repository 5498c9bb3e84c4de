//! In-process cache store backed by moka.
//!
//! Uses `moka` for concurrent TTL caching. Each entry carries its own
//! sliding window; a per-entry [`Expiry`] restarts the window on every read,
//! so an entry stays live as long as it keeps being accessed. Expired
//! entries are simply absent on the next lookup, there is no sweeper.

use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;
use serde_json::Value;

use crate::domain::errors::CallResult;
use crate::domain::ports::CacheStore;

/// Maximum number of cached entries.
const CACHE_MAX_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    value: Value,
    window: Duration,
}

/// Sliding expiration driven by each entry's own window.
struct SlidingExpiry;

impl Expiry<String, Entry> for SlidingExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.window)
    }

    fn expire_after_read(
        &self,
        _key: &String,
        entry: &Entry,
        _read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        // Reading refreshes the window.
        Some(entry.window)
    }
}

/// Concurrent memoization store with per-entry sliding expiration.
pub struct MemoryCacheStore {
    entries: Cache<String, Entry>,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    /// Create a store with the default capacity.
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(CACHE_MAX_CAPACITY)
                .expire_after(SlidingExpiry)
                .build(),
        }
    }

    /// Number of live entries (approximate, per moka semantics).
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get_or_create(
        &self,
        key: &str,
        window: Duration,
        producer: &mut dyn FnMut() -> CallResult,
    ) -> CallResult {
        // try_get_with collapses concurrent misses on the same key onto one
        // producer run and never stores faults.
        let result = self
            .entries
            .try_get_with_by_ref(key, || producer().map(|value| Entry { value, window }));

        match result {
            Ok(entry) => Ok(entry.value),
            Err(err) => Err((*err).clone()),
        }
    }
}
