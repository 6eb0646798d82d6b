//! Token printing capability (consumed by external reporting)

use std::path::Path;

use crate::shared::models::Token;

/// Renders source files annotated with the tokens extracted from them
pub trait TokenPrinter: Send + Sync {
    /// `root` resolves relative token file paths
    fn print(&self, tokens: &[Token], root: &Path) -> String;
}
