//! Pipeline orchestration

pub mod comparison_pipeline;
pub mod report;

pub use comparison_pipeline::ComparisonPipeline;
pub use report::{BaseCodeSummary, ComparisonReport, ExcludedSubmission, RunStats};
