//! Local Fallback Store Module
//!
//! In-process key/value map with per-entry expiry, used when the remote store
//! is unreachable at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheBackend, Clock, LocalEntry, SystemClock};
use crate::error::Result;

/// Store size above which an insert triggers a sweep of expired entries.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1000;

// == Local Store ==
/// Expiring map. Reclaims memory only by dropping expired entries, lazily on
/// read and in bulk once the store grows past `sweep_threshold`.
#[derive(Debug)]
pub struct LocalStore {
    /// Key-payload storage
    entries: HashMap<String, LocalEntry>,
    /// Size above which `set` sweeps expired entries
    sweep_threshold: usize,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
}

impl LocalStore {
    // == Constructor ==
    /// Creates an empty store on the system clock.
    pub fn new(sweep_threshold: usize) -> Self {
        Self::with_clock(sweep_threshold, Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(sweep_threshold: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            sweep_threshold,
            clock,
        }
    }

    // == Get ==
    /// Returns the payload if present and not expired.
    ///
    /// An expired entry is removed on the way out.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                debug!("Local cache: dropped expired key {}", key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    // == Set ==
    /// Stores a payload for `ttl_seconds`, overwriting any existing entry.
    ///
    /// Returns the number of expired entries swept as a side effect.
    pub fn set(&mut self, key: String, value: String, ttl_seconds: u64) -> usize {
        let entry = LocalEntry::new(value, ttl_seconds, self.clock.now());
        self.entries.insert(key, entry);

        if self.entries.len() > self.sweep_threshold {
            self.cleanup_expired()
        } else {
            0
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Flush ==
    /// Removes every entry, returning how many there were.
    pub fn flush(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();

        if removed > 0 {
            debug!("Local cache sweep: removed {} expired entries", removed);
        }
        removed
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new(DEFAULT_SWEEP_THRESHOLD)
    }
}

// == Local Backend ==
/// `LocalStore` behind one mutex; every path, reads included, takes the lock.
#[derive(Debug, Default)]
pub struct LocalBackend {
    store: Mutex<LocalStore>,
}

impl LocalBackend {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheBackend for LocalBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.lock().await.get(key))
    }

    async fn set(&self, key: &str, payload: String, ttl_seconds: u64) -> Result<()> {
        self.store
            .lock()
            .await
            .set(key.to_string(), payload, ttl_seconds);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.lock().await.delete(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.store.lock().await.flush();
        Ok(())
    }
}
