//! Comparison result
//!
//! Outcome of tiling two token streams, together with the divisors the similarity
//! scores are normalized by. Divisors are captured when the comparison is made so
//! that every score derived from one result uses the same denominators.

use serde::{Deserialize, Serialize};

use super::tile::Match;

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,

    /// Similarity divisor of this side at comparison time
    pub divisor: usize,

    /// Stream length including file-end tokens
    pub token_count: usize,
}

impl Participant {
    pub fn new(name: impl Into<String>, divisor: usize, token_count: usize) -> Self {
        Self {
            name: name.into(),
            divisor,
            token_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    left: Participant,
    right: Participant,
    matches: Vec<Match>,
    matched_token_count: usize,
}

impl ComparisonResult {
    pub fn new(left: Participant, right: Participant, matches: Vec<Match>) -> Self {
        let matched_token_count = matches.iter().map(|m| m.length).sum();
        Self {
            left,
            right,
            matches,
            matched_token_count,
        }
    }

    pub fn left(&self) -> &Participant {
        &self.left
    }

    pub fn right(&self) -> &Participant {
        &self.right
    }

    /// Matches in the order the tiler found them (longest first)
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn matched_token_count(&self) -> usize {
        self.matched_token_count
    }

    /// `2 * matched / (divisor(left) + divisor(right))`
    pub fn similarity(&self) -> f64 {
        ratio(
            2 * self.matched_token_count,
            self.left.divisor + self.right.divisor,
        )
    }

    /// Share of the left side covered by matches
    pub fn similarity_of_left(&self) -> f64 {
        ratio(self.matched_token_count, self.left.divisor)
    }

    /// Share of the right side covered by matches
    pub fn similarity_of_right(&self) -> f64 {
        ratio(self.matched_token_count, self.right.divisor)
    }

    pub fn maximal_similarity(&self) -> f64 {
        self.similarity_of_left().max(self.similarity_of_right())
    }

    pub fn minimal_similarity(&self) -> f64 {
        self.similarity_of_left().min(self.similarity_of_right())
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(left_divisor: usize, right_divisor: usize, matches: Vec<Match>) -> ComparisonResult {
        ComparisonResult::new(
            Participant::new("a", left_divisor, left_divisor + 1),
            Participant::new("b", right_divisor, right_divisor + 1),
            matches,
        )
    }

    #[test]
    fn test_average_similarity() {
        let r = result(4, 4, vec![Match::new(0, 0, 3)]);
        assert_eq!(r.matched_token_count(), 3);
        assert_eq!(r.similarity(), 0.75);
    }

    #[test]
    fn test_directional_similarities() {
        let r = result(4, 8, vec![Match::new(0, 0, 2), Match::new(2, 5, 2)]);
        assert_eq!(r.similarity_of_left(), 1.0);
        assert_eq!(r.similarity_of_right(), 0.5);
        assert_eq!(r.maximal_similarity(), 1.0);
        assert_eq!(r.minimal_similarity(), 0.5);
    }

    #[test]
    fn test_zero_divisor_is_zero_similarity() {
        let r = result(0, 0, Vec::new());
        assert_eq!(r.similarity(), 0.0);
        assert_eq!(r.maximal_similarity(), 0.0);
    }

    #[test]
    fn test_serializes_matches() {
        let json = serde_json::to_string(&result(4, 4, vec![Match::new(0, 0, 3)])).unwrap();
        assert!(json.contains("\"matched_token_count\":3"));
        assert!(json.contains("\"left_start\":0"));
    }
}
