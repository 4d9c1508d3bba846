//! Configuration Module
//!
//! Handles loading cache and admin server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_SWEEP_THRESHOLD;

/// Default remote store address when `REDIS_URL` is unset.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote store address
    pub redis_url: String,
    /// Default TTL in seconds for `set` calls without explicit TTL
    pub default_ttl: u64,
    /// Local store size above which expired entries are swept on insert
    pub sweep_threshold: usize,
    /// Upper bound in milliseconds for connect, probe and every remote call
    pub remote_timeout_ms: u64,
    /// Admin HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Remote store address (default: redis://localhost:6379)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `LOCAL_SWEEP_THRESHOLD` - Local sweep threshold (default: 1000)
    /// - `REMOTE_TIMEOUT_MS` - Remote call timeout in milliseconds (default: 1000)
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.redis_url),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            sweep_threshold: parse_var("LOCAL_SWEEP_THRESHOLD")
                .unwrap_or(defaults.sweep_threshold),
            remote_timeout_ms: parse_var::<u64>("REMOTE_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.remote_timeout_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Remote call timeout as a `Duration`.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            default_ttl: 300,
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
            remote_timeout_ms: 1000,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.sweep_threshold, 1000);
        assert_eq!(config.remote_timeout(), Duration::from_secs(1));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("REDIS_URL");
        env::remove_var("DEFAULT_TTL");
        env::remove_var("LOCAL_SWEEP_THRESHOLD");
        env::remove_var("REMOTE_TIMEOUT_MS");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.redis_url, DEFAULT_REDIS_URL);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.sweep_threshold, 1000);
        assert_eq!(config.remote_timeout_ms, 1000);
        assert_eq!(config.server_port, 3000);
    }
}
