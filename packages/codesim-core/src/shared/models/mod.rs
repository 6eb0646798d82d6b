//! Shared models
//!
//! The token model is the single source of truth every feature builds on.

pub mod token;

pub use token::{CodeSemantics, PositionSignificance, SourceLine, Token, TokenType, Variable};
