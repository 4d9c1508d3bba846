//! Error types for the cache
//!
//! Provides unified error handling using thiserror. None of these ever reach a
//! caller of `CacheManager`; they are logged and turned into a miss or no-op there.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Remote store could not be reached (connect, IO or timeout)
    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    /// Remote store answered with an error or an unexpected reply
    #[error("Backend error: {0}")]
    Backend(String),

    /// Stored payload could not be decoded
    #[error("Corrupt entry: {0}")]
    CorruptEntry(String),

    /// Value could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Invalid argument (empty key, malformed URL)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Key not present; only produced by the admin API
    #[error("Key not found: {0}")]
    NotFound(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_timeout()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
        {
            CacheError::BackendUnreachable(err.to_string())
        } else {
            CacheError::Backend(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidArgument(_) | CacheError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::BackendUnreachable(_) | CacheError::Backend(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CacheError::CorruptEntry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
