//! Response DTOs for the admin API

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheMode, CacheStats};

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /cache
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub key: String,
    /// TTL applied, in seconds
    pub ttl: u64,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, ttl: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' accepted", key),
            key,
            ttl,
        }
    }
}

/// Response body for DELETE /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted", key),
            key,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub message: String,
    pub backend: CacheMode,
}

impl FlushResponse {
    pub fn new(backend: CacheMode) -> Self {
        Self {
            message: "Cache flushed".to_string(),
            backend,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub backend: CacheMode,
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(backend: CacheMode, stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            backend,
            stats,
            hit_rate,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Backend chosen at startup
    pub backend: CacheMode,
    /// Current time, ISO 8601
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(backend: CacheMode) -> Self {
        Self {
            status: "healthy".to_string(),
            backend,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_flattens_counters() {
        let stats = CacheStats {
            hits: 8,
            misses: 2,
            ..CacheStats::default()
        };
        let json = serde_json::to_value(StatsResponse::new(CacheMode::Local, stats)).unwrap();

        assert_eq!(json["backend"], "local");
        assert_eq!(json["hits"], 8);
        assert!((json["hit_rate"].as_f64().unwrap() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_value(HealthResponse::healthy(CacheMode::Remote)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["backend"], "remote");
        assert!(json.get("timestamp").is_some());
    }
}
