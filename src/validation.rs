//! JSON gate applied before any content can become the target settings file
//!
//! Only the top-level shape is checked: the bytes must parse as JSON and the
//! value must be an object. Keys and nested values are not inspected.

use serde_json::Value;
use thiserror::Error;

/// Reasons a settings document is rejected
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Bytes are not JSON at all
    #[error("invalid JSON format")]
    InvalidJson(#[source] serde_json::Error),

    /// Parsed fine, but the top-level value is not an object
    #[error("settings must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Check that `bytes` hold a JSON object
pub fn validate(bytes: &[u8]) -> Result<(), ValidationError> {
    let value: Value = serde_json::from_slice(bytes).map_err(ValidationError::InvalidJson)?;
    match value {
        Value::Object(_) => Ok(()),
        other => Err(ValidationError::NotAnObject {
            found: kind_of(&other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
