//! Diagnostics describing what normalization changed

use std::collections::HashSet;

use crate::shared::models::{SourceLine, Token};

/// Source-line order before and after normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub original_order: Vec<SourceLine>,
    pub normalized_order: Vec<SourceLine>,

    /// Lines of the original order that no longer appear (dropped as dead code)
    pub removed: Vec<SourceLine>,
}

impl NormalizationReport {
    pub fn from_streams(original: &[Token], normalized: &[Token]) -> Self {
        let original_order = line_order(original);
        let normalized_order = line_order(normalized);

        let kept: HashSet<&SourceLine> = normalized_order.iter().collect();
        let removed = original_order
            .iter()
            .filter(|line| !kept.contains(line))
            .cloned()
            .collect();

        Self {
            original_order,
            normalized_order,
            removed,
        }
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Lines in stream order, one entry per change of line (file ends skipped)
pub fn line_order(tokens: &[Token]) -> Vec<SourceLine> {
    let mut order: Vec<SourceLine> = Vec::new();
    for token in tokens.iter().filter(|t| !t.is_file_end()) {
        let line = token.source_line();
        if order.last() != Some(&line) {
            order.push(line);
        }
    }
    order
}
