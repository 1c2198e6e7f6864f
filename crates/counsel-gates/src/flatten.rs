//! Dot-path flattening of nested JSON objects.
//!
//! Gate checks operate on flattened maps so that nesting cannot hide a
//! forbidden key: `{"deep": {"ground_is": "x"}}` flattens to the path
//! `deep.ground_is`, whose final segment is still matched against the
//! forbidden set.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flattens a JSON value into a map of dot-separated paths to leaf values.
///
/// Only objects are recursed into; arrays, scalars and nulls are leaves.
/// A non-object root yields an empty map.
///
/// # Example
///
/// ```
/// use counsel_gates::flatten;
/// use serde_json::json;
///
/// let flat = flatten(&json!({"a": {"b": 1}, "c": true}));
/// assert_eq!(flat.get("a.b"), Some(&json!(1)));
/// assert_eq!(flat.get("c"), Some(&json!(true)));
/// ```
pub fn flatten(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    if let Value::Object(map) = value {
        flatten_into(map, "", &mut out);
    }
    out
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut BTreeMap<String, Value>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten_into(inner, &path, out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

/// Returns the final segment of a dot-separated path.
///
/// `deep.deeper.ground_is` -> `ground_is`; a path without dots is its own
/// leaf.
pub fn leaf(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
