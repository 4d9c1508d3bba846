//! Entry Codec Module
//!
//! Converts structured values to and from the string form stored by every backend.
//! Timestamps and any other non-primitive values become strings on the way in
//! and are handed back as strings on the way out.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};

use crate::error::{CacheError, Result};

// == Cache Value ==
/// Structured value accepted by the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Serialized as an ISO-8601 string; decodes back as a plain string.
    Timestamp(DateTime<Utc>),
    Array(Vec<CacheValue>),
    Object(BTreeMap<String, CacheValue>),
}

impl CacheValue {
    /// Fallback rule for values with no structured representation: use their
    /// `Display` output.
    pub fn coerce(value: impl Display) -> Self {
        CacheValue::String(value.to_string())
    }

    /// Converts into the JSON shape a consumer gets back from `decode`.
    pub fn into_json(self) -> Value {
        match self {
            CacheValue::Null => Value::Null,
            CacheValue::Bool(b) => Value::Bool(b),
            CacheValue::Number(n) => Value::Number(n),
            CacheValue::String(s) => Value::String(s),
            CacheValue::Timestamp(ts) => Value::String(format_timestamp(&ts)),
            CacheValue::Array(items) => {
                Value::Array(items.into_iter().map(CacheValue::into_json).collect())
            }
            CacheValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
        }
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Serialize for CacheValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CacheValue::Null => serializer.serialize_unit(),
            CacheValue::Bool(b) => serializer.serialize_bool(*b),
            CacheValue::Number(n) => n.serialize(serializer),
            CacheValue::String(s) => serializer.serialize_str(s),
            CacheValue::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            CacheValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            CacheValue::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl From<Value> for CacheValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CacheValue::Null,
            Value::Bool(b) => CacheValue::Bool(b),
            Value::Number(n) => CacheValue::Number(n),
            Value::String(s) => CacheValue::String(s),
            Value::Array(items) => CacheValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                CacheValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<DateTime<Utc>> for CacheValue {
    fn from(ts: DateTime<Utc>) -> Self {
        CacheValue::Timestamp(ts)
    }
}

impl From<bool> for CacheValue {
    fn from(b: bool) -> Self {
        CacheValue::Bool(b)
    }
}

impl From<i64> for CacheValue {
    fn from(n: i64) -> Self {
        CacheValue::Number(n.into())
    }
}

impl From<f64> for CacheValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(CacheValue::Null, CacheValue::Number)
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue::String(s.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue::String(s)
    }
}

impl<T: Into<CacheValue>> From<Vec<T>> for CacheValue {
    fn from(items: Vec<T>) -> Self {
        CacheValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CacheValue>> From<Option<T>> for CacheValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CacheValue::Null, Into::into)
    }
}

// == Encode ==
/// Serializes a value into its stored form.
///
/// Fails with `Serialization` only when the value's own `Serialize` impl
/// refuses (e.g. a map keyed by a compound type).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))
}

// == Decode ==
/// Parses a stored payload back into a JSON value.
pub fn decode(payload: &str) -> Result<Value> {
    serde_json::from_str(payload).map_err(|e| CacheError::CorruptEntry(e.to_string()))
}

/// Parses a stored payload into a caller-chosen type.
///
/// A payload that is valid JSON but does not fit `T` is also `CorruptEntry`.
pub fn decode_as<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| CacheError::CorruptEntry(e.to_string()))
}
