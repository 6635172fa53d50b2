//! Layer merging.
//!
//! A config layer only names the fields it wants to change. Merging walks the
//! layer and writes each named value into the document built from earlier
//! layers:
//! - objects are walked key by key, so sibling keys survive
//! - arrays are values, not collections to extend: a layer's list wins whole
//! - `null` means "not set here" and never clears an earlier value

use serde_json::Value;

/// Merge `layer` onto `base` and return the result.
///
/// # Example
/// ```
/// use serde_json::json;
/// use layered_conf::config::deep_merge;
///
/// let base = json!({"listen": {"host": "0.0.0.0", "port": 80}, "admins": ["root"]});
/// let layer = json!({"listen": {"port": 8080}, "admins": ["alice"], "debug": null});
///
/// assert_eq!(
///     deep_merge(base, layer),
///     json!({"listen": {"host": "0.0.0.0", "port": 8080}, "admins": ["alice"], "debug": null})
/// );
/// ```
pub fn deep_merge(mut base: Value, layer: Value) -> Value {
    merge_into(&mut base, layer);
    base
}

/// Merge layers in order onto an empty document.
pub fn deep_merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

fn merge_into(target: &mut Value, layer: Value) {
    match layer {
        Value::Null => {}
        Value::Object(fields) => match target {
            Value::Object(existing) => {
                for (key, value) in fields {
                    match existing.get_mut(&key) {
                        Some(slot) => merge_into(slot, value),
                        None => {
                            existing.insert(key, value);
                        }
                    }
                }
            }
            other => *other = Value::Object(fields),
        },
        value => *target = value,
    }
}
