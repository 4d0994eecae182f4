use serde_json::{Map, Value};

/// Shape of the value a field type stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    List,
    Structured,
}

/// A decoded field value. Each field type stores exactly one of these shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    List(Vec<Value>),
    Structured(Map<String, Value>),
}

impl ValueKind {
    /// Decode a JSON value into this shape. `null` and mismatched shapes decode to `None`.
    pub fn decode(self, raw: Value) -> Option<FieldValue> {
        match (self, raw) {
            (_, Value::Null) => None,
            (ValueKind::List, Value::Array(items)) => Some(FieldValue::List(items)),
            (ValueKind::Structured, Value::Object(map)) => Some(FieldValue::Structured(map)),
            (ValueKind::Scalar, Value::Array(_) | Value::Object(_)) => None,
            (ValueKind::Scalar, scalar) => Some(FieldValue::Scalar(scalar)),
            _ => None,
        }
    }

    /// Parse stored text. Malformed text is treated as "no value".
    pub fn deserialize(self, text: &str) -> Option<FieldValue> {
        match serde_json::from_str::<Value>(text) {
            Ok(raw) => self.decode(raw),
            Err(err) => {
                tracing::warn!(kind = ?self, error = %err, "discarding malformed field value");
                None
            }
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Scalar(_) => ValueKind::Scalar,
            FieldValue::List(_) => ValueKind::List,
            FieldValue::Structured(_) => ValueKind::Structured,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::Scalar(value) => value.clone(),
            FieldValue::List(items) => Value::Array(items.clone()),
            FieldValue::Structured(map) => Value::Object(map.clone()),
        }
    }

    /// Text form handed to the host for storage.
    pub fn serialize(&self) -> String {
        self.to_value().to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            FieldValue::Structured(map) => map.get(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_matching_shapes_only() {
        assert_eq!(
            ValueKind::Structured.decode(json!({"choice": "A"})),
            Some(FieldValue::Structured(
                json!({"choice": "A"}).as_object().unwrap().clone()
            ))
        );
        assert_eq!(ValueKind::List.decode(json!({"choice": "A"})), None);
        assert_eq!(ValueKind::Scalar.decode(json!(["a"])), None);
        assert_eq!(ValueKind::Scalar.decode(Value::Null), None);
        assert_eq!(
            ValueKind::Scalar.decode(json!(3)),
            Some(FieldValue::Scalar(json!(3)))
        );
    }

    #[test]
    fn malformed_text_is_no_value() {
        assert_eq!(ValueKind::Structured.deserialize("{\"choice\":"), None);
        assert_eq!(ValueKind::List.deserialize("null"), None);
    }

    #[test]
    fn serialize_matches_json_encoding() {
        let value = FieldValue::List(vec![json!("a"), json!("b")]);
        assert_eq!(value.serialize(), "[\"a\",\"b\"]");
        assert_eq!(ValueKind::List.deserialize(&value.serialize()), Some(value));
    }
}
