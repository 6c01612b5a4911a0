//! Canonical JSON serialization for signed payloads.
//!
//! Signatures over JSON payloads are computed on a canonical form: object
//! keys sorted recursively, no insignificant whitespace.

use serde::Serialize;
use serde_json::{Map, Value};

/// Recursively sort object keys for deterministic serialization.
pub fn canonicalize_json_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut out = Map::new();
            for key in keys {
                if let Some(v) = map.get(key) {
                    out.insert(key.clone(), canonicalize_json_value(v));
                }
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(canonicalize_json_value).collect()),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}

/// Serializes `value` to canonical JSON bytes.
///
/// # Errors
///
/// Returns the serializer error if `value` cannot be represented as JSON.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_vec(&canonicalize_json_value(&value))
}
