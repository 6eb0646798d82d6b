//! Tiling domain models

pub mod comparison;
pub mod tile;

pub use comparison::{ComparisonResult, Participant};
pub use tile::Match;
