//! Dependency policy between statements
//!
//! The policy is only consulted for statement pairs that touch a common variable;
//! position barriers and loop handling are structural and live in the graph.

use crate::shared::models::CodeSemantics;

/// Variable-level relation from an earlier statement to a later one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyEdge {
    /// Later statement reads what the earlier one writes
    VariableFlow,

    /// Later statement overwrites what the earlier one reads
    VariableReverseFlow,

    /// Both statements write the same variable
    VariableOrder,
}

impl DependencyEdge {
    /// Whether the later statement consumes data produced by the earlier one
    pub fn carries_data(&self) -> bool {
        matches!(self, DependencyEdge::VariableFlow)
    }
}

/// Decides which variable-level relations constrain reordering
pub trait DependencyPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Relations from `earlier` to `later` (both in original stream order)
    fn relations(&self, earlier: &CodeSemantics, later: &CodeSemantics) -> Vec<DependencyEdge>;
}

/// Orders every pair sharing a variable that at least one of them writes
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservativeDependencyPolicy;

impl DependencyPolicy for ConservativeDependencyPolicy {
    fn name(&self) -> &'static str {
        "conservative"
    }

    fn relations(&self, earlier: &CodeSemantics, later: &CodeSemantics) -> Vec<DependencyEdge> {
        let mut edges = Vec::new();
        if !later.reads().is_disjoint(earlier.writes()) {
            edges.push(DependencyEdge::VariableFlow);
        }
        if !later.writes().is_disjoint(earlier.reads()) {
            edges.push(DependencyEdge::VariableReverseFlow);
        }
        if !later.writes().is_disjoint(earlier.writes()) {
            edges.push(DependencyEdge::VariableOrder);
        }
        edges
    }
}
