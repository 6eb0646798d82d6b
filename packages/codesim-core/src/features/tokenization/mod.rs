//! Tokenizer adapters
//!
//! Implementations of the [`Tokenizer`](crate::shared::ports::Tokenizer) port.

pub mod infrastructure;

pub use infrastructure::{SourceLanguage, TreeSitterTokenizer};
