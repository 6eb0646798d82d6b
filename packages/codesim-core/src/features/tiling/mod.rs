//! Similarity engine (Greedy String Tiling)
//!
//! Finds a maximal set of non-overlapping runs of equal token types between two
//! streams and turns the matched-token count into similarity scores.
//!
//! # Example
//!
//! ```text
//! left  = [a b c d e]       right = [a b c x y]       minimum tile length 3
//! match = (0, 0, len 3)     divisor 4 + 4             similarity 2*3/8 = 0.75
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{ComparisonResult, Match, Participant};
pub use infrastructure::{GreedyStringTiler, TokenMarks, WindowIndex};
