//! Greedy String Tiling
//!
//! # Algorithm
//!
//! ```text
//! loop:
//!   best = longest run of equal, unmarked tokens (left, right)
//!          ties: smallest left start, then smallest right start
//!   if best.length < minimum_tile_length: stop
//!   record best, mark its tokens on both sides
//! ```
//!
//! The result is exactly the brute-force definition above. Candidate start pairs come
//! from a [`WindowIndex`] over the right stream: any run of at least
//! `minimum_tile_length` tokens starts with two equal windows, so only pairs sharing a
//! window hash are extended.
//!
//! # Performance
//!
//! - Token types interned to `u32` once per comparison
//! - Window index built once; marked candidates are rejected during extension
//! - Scan of a left position stops as soon as it cannot beat the current best

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::marking::TokenMarks;
use super::window_index::{window_hashes, WindowIndex};
use crate::config::ComparisonConfig;
use crate::features::submission::domain::{Submission, SubmissionError};
use crate::features::tiling::domain::{ComparisonResult, Match, Participant};
use crate::shared::models::{Token, TokenType};
use crate::shared::ports::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyStringTiler {
    minimum_tile_length: usize,
}

impl GreedyStringTiler {
    /// Tiler reporting runs of at least `minimum_tile_length` tokens (at least 1)
    pub fn new(minimum_tile_length: usize) -> Self {
        Self {
            minimum_tile_length: minimum_tile_length.max(1),
        }
    }

    pub fn from_config(config: &ComparisonConfig, tokenizer: &dyn Tokenizer) -> Self {
        Self::new(config.minimum_tile_length_for(tokenizer))
    }

    pub fn minimum_tile_length(&self) -> usize {
        self.minimum_tile_length
    }

    /// Compare two ready submissions
    ///
    /// Positions either side matched against base code are excluded from tiling.
    /// `subtract_base_code` only controls the divisors stored in the result.
    pub fn compare(
        &self,
        left: &Submission,
        right: &Submission,
        subtract_base_code: bool,
    ) -> Result<ComparisonResult, SubmissionError> {
        let left_tokens = left.comparable_tokens("compare")?;
        let right_tokens = right.comparable_tokens("compare")?;

        let matches = self.tile(
            left_tokens,
            base_code_marks(left, left_tokens),
            right_tokens,
            base_code_marks(right, right_tokens),
        );

        let result = ComparisonResult::new(
            Participant::new(
                left.name(),
                left.similarity_divisor(subtract_base_code),
                left_tokens.len(),
            ),
            Participant::new(
                right.name(),
                right.similarity_divisor(subtract_base_code),
                right_tokens.len(),
            ),
            matches,
        );

        trace!(
            left = left.name(),
            right = right.name(),
            matched = result.matched_token_count(),
            similarity = result.similarity(),
            "compared submissions"
        );
        Ok(result)
    }

    /// Compare a submission against the base code (submission on the left)
    pub fn compare_with_base_code(
        &self,
        submission: &Submission,
        base_code: &Submission,
    ) -> Result<ComparisonResult, SubmissionError> {
        let tokens = submission.comparable_tokens("compare with base code")?;
        let base_tokens = base_code.comparable_tokens("compare with base code")?;

        let matches = self.tile_tokens(tokens, base_tokens);
        let result = ComparisonResult::new(
            Participant::new(
                submission.name(),
                submission.similarity_divisor(false),
                tokens.len(),
            ),
            Participant::new(
                base_code.name(),
                base_code.similarity_divisor(false),
                base_tokens.len(),
            ),
            matches,
        );

        debug!(
            submission = submission.name(),
            base_code = base_code.name(),
            matched = result.matched_token_count(),
            "compared with base code"
        );
        Ok(result)
    }

    /// Tile two streams with only their file ends marked
    pub fn tile_tokens(&self, left: &[Token], right: &[Token]) -> Vec<Match> {
        self.tile(
            left,
            TokenMarks::for_tokens(left),
            right,
            TokenMarks::for_tokens(right),
        )
    }

    /// Tile two streams starting from the given marks
    ///
    /// Marks are consumed: they are working state of this one comparison.
    pub fn tile(
        &self,
        left: &[Token],
        mut left_marks: TokenMarks,
        right: &[Token],
        mut right_marks: TokenMarks,
    ) -> Vec<Match> {
        let length = self.minimum_tile_length;
        if left.len() < length || right.len() < length {
            return Vec::new();
        }

        let (left_ids, right_ids) = intern(left, right);
        let left_hashes = window_hashes(&left_ids, length);
        let index = WindowIndex::build(&right_ids, &right_marks, length);

        let mut matches = Vec::new();
        loop {
            let mut best: Option<Match> = None;
            let mut best_length = length - 1;

            for (i, hash) in left_hashes.iter().enumerate() {
                if left.len() - i <= best_length {
                    break;
                }
                if left_marks.is_marked(i) {
                    continue;
                }

                for &j in index.candidates(*hash) {
                    if right.len() - j <= best_length {
                        continue;
                    }
                    let run = run_length(&left_ids, &left_marks, i, &right_ids, &right_marks, j);
                    if run > best_length {
                        best_length = run;
                        best = Some(Match::new(i, j, run));
                    }
                }
            }

            match best {
                Some(found) => {
                    left_marks.mark_range(found.left_range());
                    right_marks.mark_range(found.right_range());
                    matches.push(found);
                }
                None => break,
            }
        }

        matches
    }
}

/// Marks of a submission's stream, with its base-code matches excluded
fn base_code_marks(submission: &Submission, tokens: &[Token]) -> TokenMarks {
    let mut marks = TokenMarks::for_tokens(tokens);
    if let Some(base) = submission.base_code_comparison() {
        marks.mark_left_of(base.matches());
    }
    marks
}

/// Map token types of both streams to dense ids
fn intern(left: &[Token], right: &[Token]) -> (Vec<u32>, Vec<u32>) {
    let mut ids: FxHashMap<&TokenType, u32> = FxHashMap::default();
    let left_ids = intern_into(&mut ids, left);
    let right_ids = intern_into(&mut ids, right);
    (left_ids, right_ids)
}

fn intern_into<'t>(ids: &mut FxHashMap<&'t TokenType, u32>, tokens: &'t [Token]) -> Vec<u32> {
    tokens
        .iter()
        .map(|token| {
            let next = ids.len() as u32;
            *ids.entry(&token.token_type).or_insert(next)
        })
        .collect()
}

/// Length of the run of equal unmarked tokens starting at `(i, j)`
fn run_length(
    left: &[u32],
    left_marks: &TokenMarks,
    i: usize,
    right: &[u32],
    right_marks: &TokenMarks,
    j: usize,
) -> usize {
    let mut k = 0;
    while i + k < left.len()
        && j + k < right.len()
        && !left_marks.is_marked(i + k)
        && !right_marks.is_marked(j + k)
        && left[i + k] == right[j + k]
    {
        k += 1;
    }
    k
}
