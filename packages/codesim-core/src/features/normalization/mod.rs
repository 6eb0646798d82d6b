//! Token String Normalization
//!
//! Rewrites a token stream so that two submissions which differ only by
//! dead-code insertion or by reordering independent statements produce the same
//! stream.
//!
//! # Algorithm
//!
//! ```text
//! tokens ──► statements (one per source line, file ends on their own)
//!        ──► dependency graph (variable flow + position barriers)
//!        ──► keep propagation (observable statements and what they read from)
//!        ──► canonical topological order (ties broken by token types)
//!        ──► tokens of kept statements
//! ```
//!
//! Which statements depend on each other is decided by a
//! [`DependencyPolicy`](domain::DependencyPolicy); the default only allows moves it can
//! prove safe from the read/write annotations.

pub mod domain;
pub mod infrastructure;

pub use domain::{
    ConservativeDependencyPolicy, DependencyEdge, DependencyPolicy, NormalizationError,
    NormalizationReport, Statement,
};
pub use infrastructure::{NormalizationGraph, TokenStringNormalizer};
