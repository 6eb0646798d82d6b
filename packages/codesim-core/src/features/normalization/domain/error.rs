//! Normalization errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// A token carries no semantics, so dependencies cannot be derived
    #[error("token {index} carries no semantics")]
    MissingSemantics { index: usize },

    /// The produced stream is not a reordered subsequence of the input
    #[error("normalized stream is inconsistent with its input: {0}")]
    Inconsistency(String),
}
