//! Parameter key normalization
//!
//! Callers send camelCase keys; the engine script reads snake_case. Only
//! object keys are rewritten. Values, including strings that look like paths
//! or contain shell metacharacters, pass through untouched: they reach the
//! engine as one JSON argument in the argument vector and are never
//! interpreted by a shell.

use serde_json::{Map, Value};

/// Rewrite every object key in the tree from camelCase to snake_case
///
/// Recurses through nested objects and arrays. Array order and all
/// non-object values are preserved.
///
/// # Example
///
/// ```
/// use godot_gateway::gateway::params::normalize_keys;
/// use serde_json::json;
///
/// let normalized = normalize_keys(json!({"nodeType": "Sprite2D"}));
/// assert_eq!(normalized, json!({"node_type": "Sprite2D"}));
/// ```
pub fn normalize_keys(tree: Value) -> Value {
    match tree {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (camel_to_snake(&key), normalize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        scalar => scalar,
    }
}

/// `sceneName` -> `scene_name`; a leading capital does not get an underscore
///
/// Every capital is handled on its own, so acronyms split per letter:
/// `HTTPRequest` -> `h_t_t_p_request`.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
