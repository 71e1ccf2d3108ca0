use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    InvalidInput(String),
    MalformedInput(String),
    HeaderNotFound,
    SchemaTooShort {
        expected: usize,
        found: usize,
    },
    SchemaMismatch {
        /// 1-based column position of the first mismatch
        position: usize,
        expected: String,
        actual: String,
    },
    LLMError(String),
    Timeout(u64),
    Cancelled,
    ConfigError(String),
    IoError(String),
}

impl AppError {
    /// Input and structural errors are the caller's fault; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidInput(_)
                | AppError::MalformedInput(_)
                | AppError::HeaderNotFound
                | AppError::SchemaTooShort { .. }
                | AppError::SchemaMismatch { .. }
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "{}", msg),
            AppError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            AppError::HeaderNotFound => {
                write!(f, "Expected header row was not found in CSV file")
            }
            AppError::SchemaTooShort { expected, found } => {
                write!(f, "Expected {} columns, but found {}", expected, found)
            }
            AppError::SchemaMismatch {
                position,
                expected,
                actual,
            } => write!(
                f,
                "Header mismatch at position {}: Expected '{}', but found '{}'",
                position, expected, actual
            ),
            AppError::LLMError(msg) => write!(f, "LLM error: {}", msg),
            AppError::Timeout(secs) => write!(f, "LLM request timed out after {}s", secs),
            AppError::Cancelled => write!(f, "Processing was cancelled"),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message() {
        let err = AppError::SchemaMismatch {
            position: 4,
            expected: "Currency".to_string(),
            actual: "Curr".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Header mismatch at position 4: Expected 'Currency', but found 'Curr'"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AppError::HeaderNotFound.is_client_error());
        assert!(AppError::InvalidInput("File must be a CSV file".into()).is_client_error());
        assert!(!AppError::IoError("disk full".into()).is_client_error());
        assert!(!AppError::Timeout(5).is_client_error());
    }
}
