use crate::protocol::types::Envelope;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("security violation: path '{0}' resolves outside the project root")]
    PathOutsideRoot(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("invalid directory: {0}")]
    NotADirectory(String),
    #[error("failed to read file '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid params for {command}: {reason}")]
    InvalidParams { command: String, reason: String },
    #[error("unexpected error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::PathOutsideRoot(_) => "PathOutsideRoot",
            AppError::NotFound(_) => "NotFound",
            AppError::NotADirectory(_) => "NotADirectory",
            AppError::ReadFailed { .. } => "ReadFailed",
            AppError::WriteFailed { .. } => "WriteFailed",
            AppError::InvalidJson(_) => "InvalidJson",
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::UnknownCommand(_) => "UnknownCommand",
            AppError::InvalidParams { .. } => "InvalidParams",
            AppError::Internal(_) => "Internal",
        }
    }

    pub fn read_failed(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(path.to_string())
        } else {
            AppError::ReadFailed { path: path.to_string(), source }
        }
    }

    pub fn write_failed(path: &str, source: std::io::Error) -> Self {
        AppError::WriteFailed { path: path.to_string(), source }
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub fn into_envelope(err: &AppError) -> Envelope {
    Envelope::Error { message: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn not_found_is_distinct_from_security_violation() {
        let missing = AppError::read_failed("a.txt", io::Error::from(io::ErrorKind::NotFound));
        let outside = AppError::PathOutsideRoot("../a.txt".into());
        assert_eq!(missing.code(), "NotFound");
        assert!(missing.to_string().contains("not found"));
        assert!(outside.to_string().contains("outside the project root"));
        assert_ne!(missing.to_string(), outside.to_string());
    }

    #[test]
    fn read_failure_keeps_cause() {
        let err = AppError::read_failed("b.bin", io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"));
        assert_eq!(err.code(), "ReadFailed");
        assert!(err.to_string().contains("valid UTF-8"));
    }

    #[test]
    fn envelope_carries_message() {
        let env = into_envelope(&AppError::UnknownCommand("delete".into()));
        let v = serde_json::to_value(env).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "unknown command: delete");
    }
}
