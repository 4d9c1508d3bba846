//! Local Entry Module
//!
//! Defines the structure for entries held by the in-process store.

use chrono::{DateTime, Duration, Utc};

/// Longest TTL honored by either backend: ten years.
pub const MAX_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

// == Local Entry ==
/// Represents a single stored payload with its expiry.
#[derive(Debug, Clone)]
pub struct LocalEntry {
    /// The encoded value
    pub value: String,
    /// When the entry stops being visible
    pub expires_at: DateTime<Utc>,
}

impl LocalEntry {
    // == Constructor ==
    /// Creates an entry written at `now` that lives for `ttl_seconds`.
    ///
    /// TTLs beyond `MAX_TTL_SECONDS` are clamped.
    pub fn new(value: String, ttl_seconds: u64, now: DateTime<Utc>) -> Self {
        let ttl = Duration::seconds(ttl_seconds.min(MAX_TTL_SECONDS) as i64);

        Self {
            value,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its expiry timestamp.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Utc::now();
        let entry = LocalEntry::new("\"v\"".to_string(), 60, now);

        assert_eq!(entry.value, "\"v\"");
        assert_eq!(entry.expires_at, now + Duration::seconds(60));
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let entry = LocalEntry::new("1".to_string(), 10, now);

        assert!(!entry.is_expired(now + Duration::seconds(9)));
        assert!(entry.is_expired(now + Duration::seconds(10)));
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let now = Utc::now();
        let entry = LocalEntry::new("1".to_string(), 0, now);
        assert!(entry.is_expired(now));
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let now = Utc::now();
        let entry = LocalEntry::new("1".to_string(), u64::MAX, now);
        assert_eq!(
            entry.expires_at,
            now + Duration::seconds(MAX_TTL_SECONDS as i64)
        );
    }
}
