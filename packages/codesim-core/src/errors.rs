//! Error types for codesim-core
//!
//! Batch-level failures. Per-submission failures are [`SubmissionError`]s, recorded
//! on the submission and reported as exclusions; they only surface here when a
//! caller explicitly asks for them (e.g. an unusable base code).

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::submission::SubmissionError;

/// Main error type for codesim-core operations
#[derive(Debug, Error)]
pub enum CodesimError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Two submissions of one run share a name
    #[error("Duplicate submission name '{0}'")]
    DuplicateSubmissionName(String),

    /// Base code did not become comparable
    #[error("Invalid base code: {0}")]
    InvalidBaseCode(SubmissionError),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Submission error surfaced to the caller
    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),
}

impl CodesimError {
    pub fn thread_pool(msg: impl Into<String>) -> Self {
        CodesimError::ThreadPool(msg.into())
    }
}

/// Result type alias for codesim operations
pub type Result<T> = std::result::Result<T, CodesimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: CodesimError = ConfigError::MissingVersion.into();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_invalid_base_code_message() {
        let err = CodesimError::InvalidBaseCode(SubmissionError::EmptySubmission {
            name: "template".to_string(),
        });
        assert!(err.to_string().contains("template"));
    }
}
