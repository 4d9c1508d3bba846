//! Cache Manager Module
//!
//! Public entry point. Picks a backend once at startup and never lets a
//! backend failure reach the caller: reads degrade to a miss, writes to a no-op.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::stats::StatsCounters;
use crate::cache::{
    codec, CacheBackend, CacheMode, CacheStats, LocalBackend, LocalStore, RemoteStore,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache Manager ==
/// Best-effort cache shared by every request handler.
///
/// Cloning is cheap and every clone talks to the same backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheBackend>,
    mode: CacheMode,
    default_ttl: u64,
    stats: Arc<StatsCounters>,
}

impl CacheManager {
    // == Constructors ==
    /// Probes the remote store once and binds to it, or to a fresh local
    /// store if the probe fails.
    ///
    /// The choice is final for the lifetime of the manager: later remote
    /// failures are contained per call and do not switch to the local store.
    pub async fn connect(config: &Config) -> Self {
        match RemoteStore::connect(&config.redis_url, config.remote_timeout()).await {
            Ok(remote) => {
                info!("Redis cache initialized at {}", config.redis_url);
                Self::with_backend(Arc::new(remote), CacheMode::Remote, config.default_ttl)
            }
            Err(e) => {
                warn!(
                    "Redis cache not available at {}, using local cache: {}",
                    config.redis_url, e
                );
                Self::local(config)
            }
        }
    }

    /// Builds a manager on a fresh local store, skipping the probe.
    pub fn local(config: &Config) -> Self {
        let store = LocalStore::new(config.sweep_threshold);
        Self::with_backend(
            Arc::new(LocalBackend::new(store)),
            CacheMode::Local,
            config.default_ttl,
        )
    }

    /// Builds a manager on an explicit backend.
    pub fn with_backend(
        backend: Arc<dyn CacheBackend>,
        mode: CacheMode,
        default_ttl: u64,
    ) -> Self {
        Self {
            backend,
            mode,
            default_ttl,
            stats: Arc::new(StatsCounters::default()),
        }
    }

    // == Accessors ==
    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Returns a snapshot of the manager's counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Get ==
    /// Returns the cached value, or `None` on a miss or any failure.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.read(key, codec::decode).await
    }

    /// Returns the cached value decoded as `T`.
    ///
    /// A stored value that does not fit `T` counts as a miss.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.read(key, codec::decode_as::<T>).await
    }

    async fn read<T>(&self, key: &str, decode: impl FnOnce(&str) -> Result<T>) -> Option<T> {
        let result = match validate_key(key) {
            Ok(()) => self.backend.get(key).await,
            Err(e) => Err(e),
        };

        let value = match result.and_then(|payload| payload.map(|p| decode(&p)).transpose()) {
            Ok(value) => value,
            Err(e) => {
                self.contain("get", key, &e);
                None
            }
        };

        if value.is_some() {
            self.stats.record_hit();
            debug!("Cache hit: {}", key);
        } else {
            self.stats.record_miss();
            debug!("Cache miss: {}", key);
        }
        value
    }

    // == Set ==
    /// Stores `value` for the default TTL.
    pub async fn set<V: Serialize + ?Sized>(&self, key: &str, value: &V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Stores `value` for `ttl_seconds`, replacing any existing entry.
    ///
    /// A failed write is logged and dropped.
    pub async fn set_with_ttl<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
        ttl_seconds: u64,
    ) {
        let result = match validate_key(key).and_then(|()| codec::encode(value)) {
            Ok(payload) => self.backend.set(key, payload, ttl_seconds).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.stats.record_write();
                debug!("Cache set: {} (ttl {}s)", key, ttl_seconds);
            }
            Err(e) => self.contain("set", key, &e),
        }
    }

    // == Delete ==
    /// Removes `key`. Absent keys and failures are not reported.
    pub async fn delete(&self, key: &str) {
        let result = match validate_key(key) {
            Ok(()) => self.backend.delete(key).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.stats.record_delete();
                debug!("Cache deleted: {}", key);
            }
            Err(e) => self.contain("delete", key, &e),
        }
    }

    // == Flush ==
    /// Removes every entry from the active backend.
    pub async fn flush(&self) {
        match self.backend.flush().await {
            Ok(()) => {
                self.stats.record_flush();
                info!(mode = %self.mode, "Cache flushed");
            }
            Err(e) => self.contain("flush", "", &e),
        }
    }

    // == Read Through ==
    /// Returns the cached value for `key`, or computes, stores and returns it.
    ///
    /// The computed value is returned even if storing it fails.
    pub async fn get_or_insert_with<V, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: Option<u64>,
        compute: F,
    ) -> V
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(cached) = self.get_as::<V>(key).await {
            return cached;
        }

        let value = compute().await;
        self.set_with_ttl(key, &value, ttl_seconds.unwrap_or(self.default_ttl))
            .await;
        value
    }

    /// Logs a contained failure with enough context to diagnose the backend.
    fn contain(&self, op: &str, key: &str, err: &CacheError) {
        self.stats.record_error();
        match err {
            CacheError::CorruptEntry(_) | CacheError::InvalidArgument(_) => {
                warn!(op, key, mode = %self.mode, error = %err, "Cache {} skipped", op);
            }
            _ => {
                error!(op, key, mode = %self.mode, error = %err, "Cache {} error", op);
            }
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument("Key cannot be empty".to_string()));
    }
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use async_trait::async_trait;
    use serde_json::json;

    fn local_manager() -> (CacheManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let store = LocalStore::with_clock(1000, clock.clone());
        let manager = CacheManager::with_backend(
            Arc::new(LocalBackend::new(store)),
            CacheMode::Local,
            300,
        );
        (manager, clock)
    }

    /// Backend whose every call fails as if the server went away.
    struct DownBackend;

    #[async_trait]
    impl CacheBackend for DownBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(CacheError::BackendUnreachable("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _payload: String, _ttl: u64) -> Result<()> {
            Err(CacheError::BackendUnreachable("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Err(CacheError::BackendUnreachable("connection refused".to_string()))
        }

        async fn flush(&self) -> Result<()> {
            Err(CacheError::BackendUnreachable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_get_never_written_is_miss() {
        let (manager, _) = local_manager();
        assert!(manager.get("never").await.is_none());
        assert_eq!(manager.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_set_then_get_uses_default_ttl() {
        let (manager, clock) = local_manager();

        manager.set("dashboard_stats", &json!({"total": 12})).await;
        clock.advance_secs(299);
        assert_eq!(manager.get("dashboard_stats").await, Some(json!({"total": 12})));

        clock.advance_secs(1);
        assert!(manager.get("dashboard_stats").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected_without_state_change() {
        let (manager, _) = local_manager();

        manager.set("", &json!(1)).await;
        assert!(manager.get("").await.is_none());
        manager.delete("").await;

        let stats = manager.stats();
        assert_eq!(stats.writes, 0);
        assert_eq!(stats.deletes, 0);
        assert_eq!(stats.errors, 3);
    }

    #[tokio::test]
    async fn test_unserializable_value_is_dropped() {
        let (manager, _) = local_manager();
        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), "v");

        manager.set("bad", &bad).await;

        assert!(manager.get("bad").await.is_none());
        assert_eq!(manager.stats().errors, 1);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_miss() {
        let (manager, _) = local_manager();
        manager.set("k", &json!({"a": 1})).await;

        let typed: Option<Vec<u8>> = manager.get_as("k").await;
        assert!(typed.is_none());
    }

    #[tokio::test]
    async fn test_backend_failures_fail_open() {
        let manager = CacheManager::with_backend(Arc::new(DownBackend), CacheMode::Remote, 300);

        manager.set("k", &json!(1)).await;
        assert!(manager.get("k").await.is_none());
        manager.delete("k").await;
        manager.flush().await;

        let stats = manager.stats();
        assert_eq!(stats.errors, 4);
        assert_eq!(stats.misses, 1);
        assert_eq!(manager.mode(), CacheMode::Remote);
    }

    #[tokio::test]
    async fn test_get_or_insert_with_computes_once() {
        let (manager, _) = local_manager();
        let calls = std::sync::atomic::AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Vec<i64> = manager
                .get_or_insert_with("trends", Some(600), || async {
                    calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    vec![1, 2, 3]
                })
                .await;
            assert_eq!(value, vec![1, 2, 3]);
        }

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_insert_with_returns_value_when_backend_down() {
        let manager = CacheManager::with_backend(Arc::new(DownBackend), CacheMode::Remote, 300);

        let value: String = manager
            .get_or_insert_with("k", None, || async { "fresh".to_string() })
            .await;

        assert_eq!(value, "fresh");
    }

    #[tokio::test]
    async fn test_connect_falls_back_to_local() {
        let config = Config {
            redis_url: "redis://127.0.0.1:1".to_string(),
            remote_timeout_ms: 300,
            ..Config::default()
        };

        let manager = CacheManager::connect(&config).await;
        assert_eq!(manager.mode(), CacheMode::Local);

        manager.set("k", &json!("v")).await;
        assert_eq!(manager.get("k").await, Some(json!("v")));
    }
}
