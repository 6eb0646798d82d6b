//! Submission-level errors
//!
//! These never abort a batch. Fatal ones move the submission to
//! [`SubmissionState::Failed`](super::SubmissionState::Failed) and exclude it from
//! comparison; the others leave the submission usable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("nothing to parse for submission '{name}'")]
    EmptySubmission { name: String },

    #[error("failed to parse submission '{name}': {message}")]
    TokenizationFailure { name: String, message: String },

    /// Tokenized fine but too short to compare (a policy decision, not a tool failure)
    #[error("submission '{name}' is too short: {tokens} token(s), at least {minimum} required")]
    DegenerateSubmission {
        name: String,
        tokens: usize,
        minimum: usize,
    },

    /// Internal invariant violation in the normalizer; the original stream is kept
    #[error("normalization of '{name}' produced an inconsistent stream: {detail}")]
    NormalizationInconsistency { name: String, detail: String },

    #[error("submission '{name}' cannot be normalized: {reason}")]
    NormalizationUnsupported { name: String, reason: String },

    #[error("cannot {operation} submission '{name}' in state {state}")]
    IllegalState {
        name: String,
        operation: &'static str,
        state: String,
    },
}

/// Coarse failure category, used in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Empty,
    Tokenization,
    Degenerate,
    NormalizationInconsistency,
    NormalizationUnsupported,
    IllegalState,
}

impl SubmissionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmissionError::EmptySubmission { .. } => FailureKind::Empty,
            SubmissionError::TokenizationFailure { .. } => FailureKind::Tokenization,
            SubmissionError::DegenerateSubmission { .. } => FailureKind::Degenerate,
            SubmissionError::NormalizationInconsistency { .. } => {
                FailureKind::NormalizationInconsistency
            }
            SubmissionError::NormalizationUnsupported { .. } => {
                FailureKind::NormalizationUnsupported
            }
            SubmissionError::IllegalState { .. } => FailureKind::IllegalState,
        }
    }

    /// Whether this error excludes the submission from comparison
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SubmissionError::EmptySubmission { .. }
                | SubmissionError::TokenizationFailure { .. }
                | SubmissionError::DegenerateSubmission { .. }
        )
    }

    pub fn submission_name(&self) -> &str {
        match self {
            SubmissionError::EmptySubmission { name }
            | SubmissionError::TokenizationFailure { name, .. }
            | SubmissionError::DegenerateSubmission { name, .. }
            | SubmissionError::NormalizationInconsistency { name, .. }
            | SubmissionError::NormalizationUnsupported { name, .. }
            | SubmissionError::IllegalState { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_message() {
        let err = SubmissionError::DegenerateSubmission {
            name: "alice".to_string(),
            tokens: 2,
            minimum: 3,
        };
        assert!(err.to_string().contains("too short"));
        assert_eq!(err.kind(), FailureKind::Degenerate);
        assert!(err.is_fatal());
        assert_eq!(err.submission_name(), "alice");
    }

    #[test]
    fn test_normalization_errors_not_fatal() {
        let err = SubmissionError::NormalizationUnsupported {
            name: "bob".to_string(),
            reason: "no semantics".to_string(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::NormalizationUnsupported).unwrap();
        assert_eq!(json, "\"normalization_unsupported\"");
    }
}
