//! Per-comparison token marks
//!
//! Tiling "uses up" tokens as it records matches. The marks live here, one bitmap per
//! side and per comparison, so the shared token streams are never touched.

use std::ops::Range;

use crate::features::tiling::domain::Match;
use crate::shared::models::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMarks {
    marked: Vec<bool>,
}

impl TokenMarks {
    /// Marks for a stream with its file-end tokens already marked
    pub fn for_tokens(tokens: &[Token]) -> Self {
        Self {
            marked: tokens.iter().map(Token::is_file_end).collect(),
        }
    }

    /// Nothing marked
    pub fn unmarked(len: usize) -> Self {
        Self {
            marked: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(true)
    }

    /// Mark a range (clamped to the stream)
    pub fn mark_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.marked.len());
        let start = range.start.min(end);
        self.marked[start..end].fill(true);
    }

    /// Mark the left side of every match (the submission side of a base-code comparison)
    pub fn mark_left_of(&mut self, matches: &[Match]) {
        for m in matches {
            self.mark_range(m.left_range());
        }
    }

    /// Whether every position of the range exists and is unmarked
    pub fn is_free(&self, range: Range<usize>) -> bool {
        range.end <= self.marked.len() && self.marked[range].iter().all(|m| !m)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }
}
