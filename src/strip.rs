// src/strip.rs

//! Volatile-field stripping for archive headers
//!
//! Archive readers recompute byte offsets on every pack, so the `offset`
//! field must be removed at every nesting depth before a header can be
//! compared against a stored baseline. Everything else, including object
//! key order, is preserved verbatim.

use serde_json::Value;

/// Object keys whose values vary between runs of the packaging pipeline.
const UNSTABLE_KEYS: &[&str] = &["offset"];

/// Return a deep copy of `value` with every known-volatile key removed.
///
/// Idempotent: stripping an already-stripped value is a no-op.
pub fn remove_unstable_properties(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !UNSTABLE_KEYS.contains(&key.as_str()))
                .map(|(key, v)| (key.clone(), remove_unstable_properties(v)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.iter().map(remove_unstable_properties).collect())
        }
        scalar => scalar.clone(),
    }
}
