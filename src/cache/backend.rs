//! Backend Module
//!
//! The seam between the manager and the two stores.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

// == Cache Mode ==
/// Which backend a manager was bound to at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    Remote,
    Local,
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheMode::Remote => f.write_str("remote"),
            CacheMode::Local => f.write_str("local"),
        }
    }
}

// == Cache Backend ==
/// Storage of already-encoded payloads with per-key expiry.
///
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the payload for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `payload` under `key` for `ttl_seconds`, replacing any existing entry.
    async fn set(&self, key: &str, payload: String, ttl_seconds: u64) -> Result<()>;

    /// Removes `key`; absent keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    async fn flush(&self) -> Result<()>;
}
