//! Statement dependency graph (petgraph)
//!
//! Nodes are statements, edges always point from an earlier statement to a later
//! one, so the graph is acyclic by construction. Edges come from three sources:
//! - variable relations decided by the [`DependencyPolicy`]
//! - full position significance (barriers nothing moves across)
//! - partial position significance (a chain among partially significant statements)

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::features::normalization::domain::{
    DependencyEdge, DependencyPolicy, NormalizationError, Statement,
};
use crate::shared::models::{PositionSignificance, Variable};

/// Why one statement must stay before another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Variable(DependencyEdge),
    FullPosition,
    PartialPosition,
}

pub struct NormalizationGraph<'a> {
    statements: &'a [Statement],

    /// Node `i` is statement `i`
    graph: DiGraph<usize, EdgeKind>,

    /// Ids of the loops enclosing each statement
    loops: Vec<BTreeSet<usize>>,
}

impl<'a> NormalizationGraph<'a> {
    pub fn build(statements: &'a [Statement], policy: &dyn DependencyPolicy) -> Self {
        let mut graph = DiGraph::with_capacity(statements.len(), statements.len() * 2);
        for statement in statements {
            graph.add_node(statement.index());
        }

        let loops = enclosing_loops(statements);
        let mut accesses: FxHashMap<&Variable, Vec<usize>> = FxHashMap::default();
        let mut last_full: Option<usize> = None;
        let mut last_partial: Option<usize> = None;
        let mut since_full: Vec<usize> = Vec::new();

        for (current, statement) in statements.iter().enumerate() {
            let semantics = statement.semantics();
            let node = NodeIndex::new(current);

            // Variable relations with every earlier statement touching a shared variable
            let earlier: BTreeSet<usize> = semantics
                .variables()
                .filter_map(|variable| accesses.get(variable))
                .flatten()
                .copied()
                .collect();
            for previous in earlier {
                for edge in policy.relations(statements[previous].semantics(), semantics) {
                    graph.add_edge(NodeIndex::new(previous), node, EdgeKind::Variable(edge));
                }
            }
            for variable in semantics.variables() {
                let seen = accesses.entry(variable).or_default();
                if seen.last() != Some(&current) {
                    seen.push(current);
                }
            }

            match semantics.position_significance() {
                PositionSignificance::Full => {
                    for previous in since_full.drain(..) {
                        graph.add_edge(NodeIndex::new(previous), node, EdgeKind::FullPosition);
                    }
                    if let Some(previous) = last_full {
                        graph.add_edge(NodeIndex::new(previous), node, EdgeKind::FullPosition);
                    }
                    last_full = Some(current);
                    last_partial = Some(current);
                }
                PositionSignificance::Partial => {
                    if let Some(previous) = last_full {
                        graph.add_edge(NodeIndex::new(previous), node, EdgeKind::FullPosition);
                    }
                    if let Some(previous) = last_partial {
                        graph.add_edge(NodeIndex::new(previous), node, EdgeKind::PartialPosition);
                    }
                    last_partial = Some(current);
                    since_full.push(current);
                }
                PositionSignificance::None => {
                    if let Some(previous) = last_full {
                        graph.add_edge(NodeIndex::new(previous), node, EdgeKind::FullPosition);
                    }
                    since_full.push(current);
                }
            }
        }

        Self {
            statements,
            graph,
            loops,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether statement `to` must stay after statement `from`
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(from), NodeIndex::new(to))
            .is_some()
    }

    fn share_loop(&self, a: usize, b: usize) -> bool {
        !self.loops[a].is_disjoint(&self.loops[b])
    }

    /// Statements that must survive: observable ones plus everything they read from
    ///
    /// Inside a loop, a later write reaches an earlier read on the next iteration, so
    /// reverse flows between statements of the same loop propagate too.
    pub fn kept(&self) -> Vec<bool> {
        let mut keep: Vec<bool> = self
            .statements
            .iter()
            .map(|s| s.semantics().is_keep())
            .collect();
        let mut worklist: Vec<usize> = (0..keep.len()).filter(|&i| keep[i]).collect();

        while let Some(current) = worklist.pop() {
            let node = NodeIndex::new(current);

            for edge in self.graph.edges_directed(node, Direction::Incoming) {
                let source = edge.source().index();
                if let EdgeKind::Variable(kind) = edge.weight() {
                    if kind.carries_data() && !keep[source] {
                        keep[source] = true;
                        worklist.push(source);
                    }
                }
            }

            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let target = edge.target().index();
                if *edge.weight() == EdgeKind::Variable(DependencyEdge::VariableReverseFlow)
                    && !keep[target]
                    && self.share_loop(current, target)
                {
                    keep[target] = true;
                    worklist.push(target);
                }
            }
        }

        keep
    }

    /// Topological order of all statements, smallest canonical key first among the ready ones
    ///
    /// Returns positions in the slice the graph was built from. Build the graph over
    /// the kept statements only before calling this, or dropped statements still
    /// hold live ones back.
    pub fn linearize(&self) -> Result<Vec<usize>, NormalizationError> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.edges_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<_>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(i, _)| Reverse((self.statements[i].canonical_key(), i)))
            .collect();

        let mut order = Vec::with_capacity(self.statements.len());
        while let Some(Reverse((_, current))) = ready.pop() {
            order.push(current);
            for edge in self.graph.edges(NodeIndex::new(current)) {
                let target = edge.target().index();
                in_degree[target] -= 1;
                if in_degree[target] == 0 {
                    ready.push(Reverse((self.statements[target].canonical_key(), target)));
                }
            }
        }

        if order.len() != self.statements.len() {
            return Err(NormalizationError::Inconsistency(format!(
                "dependency graph has a cycle ({} of {} statements ordered)",
                order.len(),
                self.statements.len()
            )));
        }
        Ok(order)
    }
}

/// Loop ids enclosing each statement (loop headers and footers belong to their loop)
fn enclosing_loops(statements: &[Statement]) -> Vec<BTreeSet<usize>> {
    let mut open: Vec<usize> = Vec::new();
    let mut next_id = 0;
    let mut result = Vec::with_capacity(statements.len());

    for statement in statements {
        let semantics = statement.semantics();
        if semantics.is_loop_begin() {
            open.push(next_id);
            next_id += 1;
        }
        result.push(open.iter().copied().collect());
        if semantics.is_loop_end() {
            open.pop();
        }
    }

    result
}
