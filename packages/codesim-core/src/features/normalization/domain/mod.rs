//! Normalization domain models

pub mod dependency;
pub mod error;
pub mod report;
pub mod statement;

pub use dependency::{ConservativeDependencyPolicy, DependencyEdge, DependencyPolicy};
pub use error::NormalizationError;
pub use report::NormalizationReport;
pub use statement::Statement;
