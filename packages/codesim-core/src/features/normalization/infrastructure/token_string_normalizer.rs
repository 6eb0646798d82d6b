//! Token string normalizer
//!
//! Entry point of the normalization feature. Produces the normalized stream and
//! verifies it before handing it back, so callers never see a partially
//! rewritten stream.

use std::sync::Arc;

use tracing::debug;

use super::normalization_graph::NormalizationGraph;
use crate::features::normalization::domain::{
    ConservativeDependencyPolicy, DependencyPolicy, NormalizationError, Statement,
};
use crate::shared::models::Token;

pub struct TokenStringNormalizer {
    policy: Arc<dyn DependencyPolicy>,
}

impl Default for TokenStringNormalizer {
    fn default() -> Self {
        Self::with_policy(Arc::new(ConservativeDependencyPolicy))
    }
}

impl std::fmt::Debug for TokenStringNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStringNormalizer")
            .field("policy", &self.policy.name())
            .finish()
    }
}

impl TokenStringNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: Arc<dyn DependencyPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Normalize a token stream
    ///
    /// Every non-file-end token must carry semantics. The result keeps the order of
    /// file ends, drops statements with no observable effect, and sorts statements
    /// that are free to move by their token types.
    pub fn normalize(&self, tokens: &[Token]) -> Result<Vec<Token>, NormalizationError> {
        let statements = Statement::group(tokens)?;
        let graph = NormalizationGraph::build(&statements, self.policy.as_ref());
        let keep = graph.kept();

        // Dropped statements must not constrain the order of the survivors
        let live: Vec<Statement> = statements
            .iter()
            .zip(&keep)
            .filter(|(_, kept)| **kept)
            .map(|(statement, _)| statement.clone())
            .collect();
        let live_graph = NormalizationGraph::build(&live, self.policy.as_ref());
        let order = live_graph.linearize()?;

        let mut normalized = Vec::with_capacity(tokens.len());
        for index in order {
            normalized.extend_from_slice(&tokens[live[index].token_range()]);
        }

        verify(tokens, &normalized)?;

        debug!(
            statements = statements.len(),
            edges = graph.edge_count(),
            live_edges = live_graph.edge_count(),
            kept = live.len(),
            tokens_before = tokens.len(),
            tokens_after = normalized.len(),
            policy = self.policy.name(),
            "normalized token stream"
        );

        Ok(normalized)
    }
}

/// Normalized output must be a sub-multiset of the input with every file end intact
fn verify(original: &[Token], normalized: &[Token]) -> Result<(), NormalizationError> {
    if normalized.len() > original.len() {
        return Err(NormalizationError::Inconsistency(format!(
            "normalized stream grew from {} to {} tokens",
            original.len(),
            normalized.len()
        )));
    }

    let file_ends = |tokens: &[Token]| -> Vec<Arc<std::path::Path>> {
        tokens
            .iter()
            .filter(|t| t.is_file_end())
            .map(|t| Arc::clone(&t.file))
            .collect()
    };
    if file_ends(original) != file_ends(normalized) {
        return Err(NormalizationError::Inconsistency(
            "file boundaries changed during normalization".to_string(),
        ));
    }

    Ok(())
}
