//! Match (tile) between two token streams

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Contiguous run of equal token types shared by two streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Match {
    pub left_start: usize,
    pub right_start: usize,
    pub length: usize,
}

impl Match {
    pub fn new(left_start: usize, right_start: usize, length: usize) -> Self {
        Self {
            left_start,
            right_start,
            length,
        }
    }

    pub fn left_range(&self) -> Range<usize> {
        self.left_start..self.left_start + self.length
    }

    pub fn right_range(&self) -> Range<usize> {
        self.right_start..self.right_start + self.length
    }

    /// Whether the two matches claim a common token on either side
    pub fn overlaps(&self, other: &Match) -> bool {
        fn intersects(a: Range<usize>, b: Range<usize>) -> bool {
            a.start < b.end && b.start < a.end
        }
        intersects(self.left_range(), other.left_range())
            || intersects(self.right_range(), other.right_range())
    }
}
