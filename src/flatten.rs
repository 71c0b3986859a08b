//! Tree Flattener / Unflattener
//!
//! Converts a nested localization tree into a flat map keyed by dot-joined
//! paths and back. `unflatten` is the exact inverse of `flatten` provided no
//! key contains the separator and no path is both a leaf and an object
//! elsewhere; violating either precondition is the caller's problem, not a
//! handled case.
//!
//! # Example
//!
//! ```ignore
//! let tree = serde_json::json!({"a": {"b": "hello"}});
//! let flat = flatten(&tree)?;
//! assert_eq!(flat["a.b"], "hello");
//! ```

use crate::error::{TranslateError, TranslateResult};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Separator joining ancestor keys into a flat path
pub const KEY_SEPARATOR: char = '.';

/// Flatten a nested string tree into a dot-path map
///
/// Every leaf must be a string and every interior node an object; anything
/// else makes the input malformed.
pub fn flatten(tree: &Value) -> TranslateResult<HashMap<String, String>> {
    let mut flat = HashMap::new();
    flatten_value(tree, String::new(), &mut flat)?;
    Ok(flat)
}

fn flatten_value(
    value: &Value,
    path: String,
    flat: &mut HashMap<String, String>,
) -> TranslateResult<()> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}{}{}", path, KEY_SEPARATOR, key)
                };
                flatten_value(child, child_path, flat)?;
            }
            Ok(())
        }
        Value::String(s) => {
            flat.insert(path, s.clone());
            Ok(())
        }
        other => Err(TranslateError::InvalidJson(format!(
            "expected a nested string tree, found {} at \"{}\"",
            value_kind(other),
            path
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Rebuild a nested tree from a sorted flat map
///
/// Keys are inserted in the order the map yields them; `serde_json::Map`
/// keeps entries sorted, so serialization of the result is deterministic.
pub fn unflatten(flat: &BTreeMap<String, String>) -> Value {
    let mut root = Map::new();
    for (path, value) in flat {
        insert_path(&mut root, path, value.clone());
    }
    Value::Object(root)
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: String) {
    let mut segments = path.split(KEY_SEPARATOR).peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), Value::String(value));
            return;
        }
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(map) => current = map,
            // A path that is both a leaf and an object elsewhere is a
            // precondition violation; the later insertion wins.
            other => {
                *other = Value::Object(Map::new());
                if let Value::Object(map) = other {
                    current = map;
                } else {
                    unreachable!("just assigned an object")
                }
            }
        }
    }
}
