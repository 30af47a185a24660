pub mod list_files;
pub mod read_file;
pub mod search;
pub mod write_file;

use crate::{errors::AppError, guard::PathGuard};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Directory names never descended into while walking the tree.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "__pycache__", "node_modules", ".venv", ".idea", ".vscode"];

/// File names never reported by `list_files` or searched.
pub const EXCLUDED_FILES: &[&str] = &[".DS_Store"];

/// Filesystem operations confined to the guard's root. Handles one request
/// at a time; the command loop never runs two operations concurrently.
#[derive(Debug, Clone)]
pub struct FileService {
    guard: PathGuard,
}

impl FileService {
    pub fn new(guard: PathGuard) -> Self {
        Self { guard }
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }
}

/// Decodes a command's `params` object into its typed parameter struct.
/// Absent or `null` params count as an empty object.
pub(crate) fn parse_params<T: DeserializeOwned>(command: &str, params: Value) -> Result<T, AppError> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(AppError::InvalidParams {
                command: command.to_string(),
                reason: format!("params must be an object, got {other}"),
            })
        }
    };
    serde_json::from_value(params).map_err(|e| AppError::InvalidParams { command: command.to_string(), reason: e.to_string() })
}

pub(crate) fn to_output<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}
