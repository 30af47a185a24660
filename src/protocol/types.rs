use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One request line: `{"command": "...", "params": {...}}`.
#[derive(Debug, Deserialize)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub params: Value,
}

/// Uniform result wrapper written back for every request.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success(Map<String, Value>),
    Error { message: String },
}

impl Envelope {
    /// Wraps a command's output fields; the output must be a JSON object.
    pub fn success(fields: Value) -> Result<Self, AppError> {
        match fields {
            Value::Object(map) => Ok(Envelope::Success(map)),
            other => Err(AppError::Internal(format!("command produced a non-object result: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    pub filepath: String,
    pub line_number: usize,
    pub line_content: String,
}
