use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON type of the document handed to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootType {
    Object,
    Array,
}

impl RootType {
    /// Classify a root value. Only objects and arrays can be compressed.
    pub fn of(value: &Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(Self::Object),
            Value::Array(_) => Ok(Self::Array),
            other => Err(CodecError::InvalidRootType(json_kind(other))),
        }
    }

    /// Whether `value` has this JSON type.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Object, Value::Object(_)) | (Self::Array, Value::Array(_))
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// Short name of a value's JSON type, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
