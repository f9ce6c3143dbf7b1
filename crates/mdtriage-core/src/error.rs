//! Error types and exit codes for mdtriage
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (invalid root, structurally invalid group, bad config)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the mdtriage binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - invalid root, invalid group, bad config (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during mdtriage operations
#[derive(Error, Debug)]
pub enum TriageError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Data errors (exit code 3)
    #[error("documentation root not found: {root:?}")]
    RootNotFound { root: PathBuf },

    #[error("documentation root is not a directory: {root:?}")]
    RootNotADirectory { root: PathBuf },

    /// A group referencing a primary file absent from the classification
    /// set indicates a grouping bug, not messy input, and is surfaced hard.
    #[error("invalid consolidation group {group_id}: primary file {primary} is not in the classified set")]
    InvalidGroup { group_id: String, primary: String },

    #[error("invalid config at {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperation {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl TriageError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        TriageError::FailedOperation {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            TriageError::UnknownFormat(_) | TriageError::UsageError(_) => ExitCode::Usage,

            TriageError::RootNotFound { .. }
            | TriageError::RootNotADirectory { .. }
            | TriageError::InvalidGroup { .. }
            | TriageError::InvalidConfig { .. } => ExitCode::Data,

            TriageError::Io(_)
            | TriageError::Json(_)
            | TriageError::Toml(_)
            | TriageError::FailedOperation { .. }
            | TriageError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            TriageError::UnknownFormat(_) => "unknown_format",
            TriageError::UsageError(_) => "usage_error",
            TriageError::RootNotFound { .. } => "root_not_found",
            TriageError::RootNotADirectory { .. } => "root_not_a_directory",
            TriageError::InvalidGroup { .. } => "invalid_group",
            TriageError::InvalidConfig { .. } => "invalid_config",
            TriageError::Io(_) => "io_error",
            TriageError::Json(_) => "json_error",
            TriageError::Toml(_) => "toml_error",
            TriageError::FailedOperation { .. } => "failed_operation",
            TriageError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for mdtriage operations
pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            TriageError::UnknownFormat("records".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            TriageError::RootNotFound {
                root: PathBuf::from("/nope")
            }
            .exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            TriageError::Other("boom".into()).exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_invalid_group_is_data_error() {
        let err = TriageError::InvalidGroup {
            group_id: "setup-consolidated".into(),
            primary: "SETUP.md".into(),
        };
        assert_eq!(err.exit_code(), ExitCode::Data);
        assert!(err.to_string().contains("SETUP.md"));
    }

    #[test]
    fn test_to_json_envelope() {
        let err = TriageError::UsageError("bad flag".into());
        let json = err.to_json();
        assert_eq!(json["error"]["code"], 2);
        assert_eq!(json["error"]["type"], "usage_error");
        assert_eq!(json["error"]["message"], "bad flag");
    }
}
