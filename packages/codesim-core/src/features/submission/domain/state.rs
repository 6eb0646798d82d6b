//! Submission lifecycle
//!
//! ```text
//! Created ──parse──► Parsed ──normalize──► Normalized ──mark_ready──► Ready
//!    │                  └────────────────mark_ready─────────────────────┘
//!    └──► Failed (empty file set, tokenizer failure, too short)
//! ```

use std::fmt;

use super::error::SubmissionError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Created,
    Parsed,
    Normalized,

    /// Token stream frozen; safe to share between comparisons
    Ready,

    /// Terminal; the submission is excluded from comparison
    Failed(SubmissionError),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Created => "created",
            SubmissionState::Parsed => "parsed",
            SubmissionState::Normalized => "normalized",
            SubmissionState::Ready => "ready",
            SubmissionState::Failed(_) => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SubmissionState::Failed(_))
    }

    /// Whether the stream is present (parsed and not failed)
    pub fn has_tokens(&self) -> bool {
        matches!(
            self,
            SubmissionState::Parsed | SubmissionState::Normalized | SubmissionState::Ready
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
