use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// A field value with its Firestore type tag removed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(String),
    Reference(String),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Text content of string-like values (string, timestamp, reference)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Timestamp(s) | FieldValue::Reference(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// Unwrap a typed value such as `{"stringValue": "x"}`.
///
/// Exactly one recognised tag must be present. Anything else yields `None`
/// and the caller treats the field as absent.
pub fn unwrap_value(value: &Value) -> Option<FieldValue> {
    let tagged = value.as_object()?;
    if tagged.len() != 1 {
        return None;
    }
    let (tag, inner) = tagged.iter().next()?;

    match tag.as_str() {
        "stringValue" => inner.as_str().map(|s| FieldValue::String(s.to_string())),
        "booleanValue" => inner.as_bool().map(FieldValue::Bool),
        "timestampValue" => inner.as_str().map(|s| FieldValue::Timestamp(s.to_string())),
        "referenceValue" => inner.as_str().map(|s| FieldValue::Reference(s.to_string())),
        // int64 is transported as a decimal string
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse().ok())
            .or_else(|| inner.as_i64())
            .map(FieldValue::Integer),
        "doubleValue" => inner.as_f64().map(FieldValue::Double),
        "nullValue" => Some(FieldValue::Null),
        "mapValue" => {
            let fields = match inner.get("fields").and_then(Value::as_object) {
                Some(fields) => flatten_fields(fields),
                None => BTreeMap::new(),
            };
            Some(FieldValue::Map(fields))
        }
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().filter_map(unwrap_value).collect())
                .unwrap_or_default();
            Some(FieldValue::Array(values))
        }
        _ => None,
    }
}

/// Unwrap every entry of a `fields` object, dropping the unrecognised ones
pub fn flatten_fields(fields: &Map<String, Value>) -> BTreeMap<String, FieldValue> {
    let mut flat = BTreeMap::new();

    for (name, value) in fields {
        match unwrap_value(value) {
            Some(unwrapped) => {
                flat.insert(name.clone(), unwrapped);
            }
            None => debug!("Skipping field {} with unrecognised value {}", name, value),
        }
    }

    flat
}
