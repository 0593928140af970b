//! Content hashing for vertices
//!
//! A vertex hash is a SHA-1 hex digest over a canonicalized JSON encoding
//! of the value. Canonicalization sorts object keys recursively, so two
//! structurally equal values hash identically no matter what order their
//! keys were built in. Arrays keep their element order; scalars pass
//! through unchanged.

use serde_json::{Map, Value};
use sha1::{Digest, Sha1};

/// Rewrite `value` with object keys in lexicographic order, recursively.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key.clone(), canonicalize(value));
            }
            Value::Object(sorted)
        }
        other => other.clone(),
    }
}

/// Hash a JSON value: SHA-1 over the compact encoding of its canonical
/// form, hex-encoded. Pure; succeeds for every `Value`.
pub fn hash_value(value: &Value) -> String {
    let encoded = canonicalize(value).to_string();
    let mut hasher = Sha1::new();
    hasher.update(encoded.as_bytes());
    hex::encode(hasher.finalize())
}
