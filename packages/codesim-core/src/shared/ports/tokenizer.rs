//! Tokenizer capability
//!
//! Language front-ends plug in here. The core never branches on which language it is
//! talking to; everything it needs is the ordered token stream and a few defaults.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::shared::models::Token;

/// Failure reported by a tokenizer for a file set
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TokenizationError {
    /// Diagnostic message
    pub message: String,

    /// File that caused the failure, when known
    pub file: Option<PathBuf>,
}

impl TokenizationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
        }
    }

    pub fn in_file(message: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            message: message.into(),
            file: Some(file.into()),
        }
    }
}

/// Converts a set of source files into one ordered token stream
///
/// Implementations must append exactly one [`Token::file_end`] per file so that the
/// similarity divisor (`tokens - files`) stays consistent.
pub trait Tokenizer: Send + Sync {
    /// Stable identifier (used for quarantine directories and logs)
    fn identifier(&self) -> &str;

    /// Default minimum tile length for this language
    fn minimum_tile_length(&self) -> usize;

    /// Whether emitted tokens carry [`CodeSemantics`](crate::shared::models::CodeSemantics)
    fn supports_normalization(&self) -> bool {
        false
    }

    /// Tokenize all files of one submission
    fn parse(&self, files: &BTreeSet<PathBuf>) -> Result<Vec<Token>, TokenizationError>;
}
