//! Batch run report
//!
//! # Output Structure
//!
//! ```text
//! ComparisonReport
//! ├── comparisons: Vec<ComparisonResult>   (filtered, most similar first)
//! ├── excluded: Vec<ExcludedSubmission>    (failed submissions with reasons)
//! ├── base_code: Option<BaseCodeSummary>   (matched tokens per submission)
//! └── stats: RunStats
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::features::submission::{FailureKind, Submission};
use crate::features::tiling::ComparisonResult;

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub comparisons: Vec<ComparisonResult>,
    pub excluded: Vec<ExcludedSubmission>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_code: Option<BaseCodeSummary>,

    pub stats: RunStats,
}

impl ComparisonReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Comparison of two submissions, in either order
    pub fn comparison(&self, a: &str, b: &str) -> Option<&ComparisonResult> {
        self.comparisons.iter().find(|c| {
            (c.left().name == a && c.right().name == b)
                || (c.left().name == b && c.right().name == a)
        })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|e| e.name == name)
    }
}

/// Submission left out of comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedSubmission {
    pub name: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl ExcludedSubmission {
    pub fn from_submission(submission: &Submission) -> Option<Self> {
        submission.failure().map(|error| Self {
            name: submission.name().to_string(),
            kind: error.kind(),
            reason: error.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseCodeSummary {
    pub name: String,

    /// Tokens of each ready submission matched against the base code
    pub matched_tokens: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub submissions: usize,
    pub ready: usize,
    pub normalized: usize,
    pub comparisons_computed: usize,
    pub comparisons_reported: usize,
    pub elapsed_ms: u64,
}
