//! Submission lifecycle
//!
//! A submission turns a set of files into a frozen, comparison-ready token stream:
//! parse (tokenizer + validation), optional normalization, then `Ready`. Failures are
//! sticky and local to the submission.

pub mod domain;
pub mod infrastructure;

pub use domain::{
    compare_by_name, FailureKind, Submission, SubmissionError, SubmissionState,
    MINIMUM_TOKEN_COUNT,
};
pub use infrastructure::{DirectoryQuarantine, LineAnnotatedPrinter};
