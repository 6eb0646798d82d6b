//! Custom assertions for test verification

use codesim_core::features::tiling::{ComparisonResult, Match};

/// Assert that no token index is claimed by two matches on either side
pub fn assert_non_overlapping(matches: &[Match]) {
    for (i, a) in matches.iter().enumerate() {
        for b in &matches[i + 1..] {
            assert!(!a.overlaps(b), "Matches overlap: {:?} and {:?}", a, b);
        }
    }
}

/// Assert that every match is at least `minimum` tokens long
pub fn assert_minimum_length(matches: &[Match], minimum: usize) {
    for m in matches {
        assert!(
            m.length >= minimum,
            "Match {:?} shorter than minimum tile length {minimum}",
            m
        );
    }
}

/// Assert average similarity within floating point tolerance
pub fn assert_similarity(result: &ComparisonResult, expected: f64) {
    assert!(
        (result.similarity() - expected).abs() < 1e-9,
        "Expected similarity {expected}, got {} ({} matched tokens, divisors {} and {})",
        result.similarity(),
        result.matched_token_count(),
        result.left().divisor,
        result.right().divisor
    );
}
