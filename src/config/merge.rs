//! Merge primitives over JSON values.
//!
//! - Objects: deep-merge by key ([`deep_merge`]) or replace per key ([`overlay`])
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)

use serde_json::{Map, Value};

/// Deep merge two JSON values.
///
/// Objects merge recursively by key; arrays and scalars from `overlay` replace
/// whatever `base` held, `null` included.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (Value::Array(_), overlay @ Value::Array(_)) => overlay,
        (_, overlay) => overlay,
    }
}

/// Shallow override: every top-level key of `layer` replaces the key in `base`.
pub fn overlay(mut base: Map<String, Value>, layer: &Map<String, Value>) -> Map<String, Value> {
    for (key, value) in layer {
        base.insert(key.clone(), value.clone());
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let result = deep_merge(json!({"timeout": 100}), json!({"timeout": 200}));
        assert_eq!(result["timeout"], 200);
    }

    #[test]
    fn test_object_deep_merge() {
        let base = json!({"parameter": {"readonly": false, "allowResize": true}});
        let overlay = json!({"parameter": {"readonly": true}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["parameter"]["readonly"], true);
        assert_eq!(result["parameter"]["allowResize"], true);
    }

    #[test]
    fn test_array_replace() {
        let base = json!({"choices": ["A", "B", "C"]});
        let overlay = json!({"choices": ["X"]});
        let result = deep_merge(base, overlay);
        assert_eq!(result["choices"], json!(["X"]));
    }

    #[test]
    fn test_null_override() {
        let result = deep_merge(json!({"value": 100}), json!({"value": null}));
        assert!(result["value"].is_null());
    }

    #[test]
    fn test_overlay_replaces_nested_objects_wholesale() {
        let base = json!({"style": {"bold": true, "size": 2}, "class": ""})
            .as_object()
            .unwrap()
            .clone();
        let layer = json!({"style": {"size": 3}}).as_object().unwrap().clone();
        let result = overlay(base, &layer);
        assert_eq!(Value::Object(result), json!({"style": {"size": 3}, "class": ""}));
    }
}
