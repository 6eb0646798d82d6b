pub mod tree_sitter_tokenizer;

pub use tree_sitter_tokenizer::{SourceLanguage, TreeSitterTokenizer};
