//! Request DTOs for the admin API

use serde::Deserialize;
use serde_json::Value;

/// Request body for PUT /cache. `ttl` falls back to the default when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": {"labels": ["a"], "values": [1]}}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, json!({"labels": ["a"], "values": [1]}));
        assert!(req.ttl.is_none());
    }
}
