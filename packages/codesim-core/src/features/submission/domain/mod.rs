//! Submission domain models

pub mod error;
pub mod state;
pub mod submission;

pub use error::{FailureKind, SubmissionError};
pub use state::SubmissionState;
pub use submission::{compare_by_name, Submission, MINIMUM_TOKEN_COUNT};
