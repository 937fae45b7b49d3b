//! Typed records built from raw API payloads.
//!
//! Payload fields are read permissively: anything absent or of the wrong JSON
//! type falls back to a default instead of failing the whole record.

pub mod account;
pub mod relationship;

pub use account::*;
pub use relationship::*;

use serde_json::{Map, Value};

pub(crate) fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn u64_field(obj: &Map<String, Value>, key: &str) -> u64 {
    obj.get(key).and_then(Value::as_u64).unwrap_or(0)
}

pub(crate) fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Any non-null value, kept as raw JSON.
pub(crate) fn opaque_field(obj: &Map<String, Value>, key: &str) -> Option<Value> {
    obj.get(key).filter(|v| !v.is_null()).cloned()
}
