//! Normalization infrastructure (graph construction and linearization)

pub mod normalization_graph;
pub mod token_string_normalizer;

pub use normalization_graph::{EdgeKind, NormalizationGraph};
pub use token_string_normalizer::TokenStringNormalizer;
