//! Shape classification of arbitrary JSON payloads.

use serde_json::{Map, Value};

/// A payload classified by shape before rendering
#[derive(Debug, Clone, PartialEq)]
pub enum DrillValue {
    /// Ordered sequence, rendered as a table
    Sequence(Vec<Value>),
    /// Keyed record, rendered as key-value rows
    Record(Map<String, Value>),
    /// Anything else, rendered as a raw dump
    Scalar(Value),
}

impl DrillValue {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Record(map),
            other => Self::Scalar(other),
        }
    }

    /// Classify any serializable payload. Values that fail to serialize
    /// become a null scalar.
    pub fn from_serialize<T: serde::Serialize + ?Sized>(payload: &T) -> Self {
        Self::classify(serde_json::to_value(payload).unwrap_or(Value::Null))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sequence(_) => "sequence",
            Self::Record(_) => "record",
            Self::Scalar(_) => "scalar",
        }
    }

    /// Back to plain JSON
    pub fn to_value(&self) -> Value {
        match self {
            Self::Sequence(items) => Value::Array(items.clone()),
            Self::Record(map) => Value::Object(map.clone()),
            Self::Scalar(v) => v.clone(),
        }
    }
}

impl From<Value> for DrillValue {
    fn from(value: Value) -> Self {
        Self::classify(value)
    }
}
