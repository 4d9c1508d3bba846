//! Remote Store Adapter
//!
//! Thin client over a Redis server. Expiry is delegated to Redis' native
//! per-key TTL; every call is bounded by a timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tokio::time::timeout;
use tracing::debug;

use crate::cache::{CacheBackend, MAX_TTL_SECONDS};
use crate::error::{CacheError, Result};

/// Reconnect attempts the connection manager makes after a dropped socket.
const RECONNECT_RETRIES: usize = 1;

// == Remote Store ==
/// Redis-backed store.
///
/// `ConnectionManager` multiplexes concurrent requests over one socket and
/// replaces it in the background once it breaks. The call that hits the
/// broken socket fails; later calls use the new connection.
#[derive(Clone)]
pub struct RemoteStore {
    connection: ConnectionManager,
    timeout: Duration,
}

impl RemoteStore {
    // == Connect ==
    /// Opens a managed connection to `url` and probes it with `PING`.
    ///
    /// Both the connect and the probe are bounded by `call_timeout`.
    pub async fn connect(url: &str, call_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::InvalidArgument(format!("Invalid Redis URL {}: {}", url, e)))?;

        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(RECONNECT_RETRIES)
            .set_connection_timeout(call_timeout)
            .set_response_timeout(call_timeout);

        let connection = bounded(
            call_timeout,
            "connect",
            client.get_connection_manager_with_config(manager_config),
        )
        .await?;

        let store = Self {
            connection,
            timeout: call_timeout,
        };
        store.ping().await?;

        debug!("Connected to Redis at {}", url);
        Ok(store)
    }

    // == Ping ==
    /// Lightweight health probe.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let pong: String = bounded(
            self.timeout,
            "ping",
            redis::cmd("PING").query_async(&mut conn),
        )
        .await?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Backend(format!(
                "Unexpected PING reply: {}",
                pong
            )))
        }
    }
}

/// Runs a Redis call under `limit`, mapping elapsed time to `BackendUnreachable`.
async fn bounded<T, F>(limit: Duration, op: &str, call: F) -> Result<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match timeout(limit, call).await {
        Ok(result) => result.map_err(CacheError::from),
        Err(_) => Err(CacheError::BackendUnreachable(format!(
            "Redis {} timed out after {}ms",
            op,
            limit.as_millis()
        ))),
    }
}

#[async_trait]
impl CacheBackend for RemoteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = bounded(self.timeout, "GET", conn.get(key)).await?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    async fn set(&self, key: &str, payload: String, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.connection.clone();

        // Redis rejects a zero expiry; an already-expired write is a removal.
        if ttl_seconds == 0 {
            let _: usize = bounded(self.timeout, "DEL", conn.del(key)).await?;
            return Ok(());
        }

        let ttl = ttl_seconds.min(MAX_TTL_SECONDS);
        let _: () = bounded(self.timeout, "SETEX", conn.set_ex(key, payload, ttl)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: usize = bounded(self.timeout, "DEL", conn.del(key)).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = bounded(
            self.timeout,
            "FLUSHDB",
            redis::cmd("FLUSHDB").query_async(&mut conn),
        )
        .await?;
        Ok(())
    }
}
