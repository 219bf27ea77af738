//! Dependency graph of propositions and arguments.
//!
//! An [`ArgumentGraph`] holds two kinds of nodes: proposition nodes (labeled
//! by a [`PropLiteral`], optionally carrying a claim state and a claimer)
//! and argument nodes (labeled by argument id). Edges run
//! conclusion -> argument (support), argument -> premise, and
//! argument -> exception (tagged). The graph is indexed so that all
//! arguments for a proposition are retrieved in one hop, and adding an
//! argument always registers the negation of its conclusion so that "con"
//! lookups never fail with a not-found error.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::model::{Argument, PropLiteral};

// ============================================================================
// Node attributes
// ============================================================================

/// Claim state of a proposition node during a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Put forward by one of the parties and not yet challenged.
    Claimed,
    /// Challenged by the opposing party.
    Questioned,
}

impl NodeState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::Claimed => "claimed",
            NodeState::Questioned => "questioned",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two parties of an adversarial dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// Argues pro the issue; takes the even turns.
    Proponent,
    /// Argues con the issue; takes the odd turns.
    Respondent,
}

impl Actor {
    /// Get the actor name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Proponent => "proponent",
            Actor::Respondent => "respondent",
        }
    }

    /// The opposing party.
    pub fn opponent(&self) -> Actor {
        match self {
            Actor::Proponent => Actor::Respondent,
            Actor::Respondent => Actor::Proponent,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Internal node and edge storage
// ============================================================================

#[derive(Debug, Clone)]
struct PropNode {
    prop: PropLiteral,
    state: Option<NodeState>,
    claimer: Option<Actor>,
}

#[derive(Debug, Clone)]
struct ArgNode {
    argument: Argument,
    claimer: Option<Actor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeRef {
    Prop(usize),
    Arg(usize),
}

#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    source: NodeRef,
    target: NodeRef,
    is_exception: bool,
}

// ============================================================================
// ArgumentGraph
// ============================================================================

/// The dependency graph of an argument set.
///
/// Created empty; arguments are added one at a time, either by the case-file
/// reader (building the full knowledge base) or by the dialogue engine
/// (building a per-dialogue subgraph turn by turn). Node states are mutated
/// in place via [`ArgumentGraph::set_status`] during dialogues; the
/// knowledge-base graph is otherwise read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct ArgumentGraph {
    prop_nodes: Vec<PropNode>,
    prop_index: HashMap<PropLiteral, usize>,
    arg_nodes: Vec<ArgNode>,
    arg_index: HashMap<String, usize>,
    /// Conclusion -> supporting argument indices, in insertion order.
    support: HashMap<PropLiteral, Vec<usize>>,
    edges: Vec<EdgeRecord>,
}

impl ArgumentGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of proposition nodes.
    pub fn proposition_count(&self) -> usize {
        self.prop_nodes.len()
    }

    /// Number of argument nodes.
    pub fn argument_count(&self) -> usize {
        self.arg_nodes.len()
    }

    /// Whether the graph holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.prop_nodes.is_empty() && self.arg_nodes.is_empty()
    }

    /// Add a proposition node if absent; idempotent.
    ///
    /// If the proposition is already present the existing node is returned
    /// unchanged (its state is not touched). Returns the node index.
    pub fn add_proposition(
        &mut self,
        proposition: PropLiteral,
        state: Option<NodeState>,
    ) -> usize {
        if let Some(&idx) = self.prop_index.get(&proposition) {
            return idx;
        }
        let idx = self.prop_nodes.len();
        debug!(proposition = %proposition, "added proposition node");
        self.prop_index.insert(proposition.clone(), idx);
        self.prop_nodes.push(PropNode {
            prop: proposition,
            state,
            claimer: None,
        });
        idx
    }

    /// Add an argument node, its proposition nodes, and their edges.
    ///
    /// Registers the conclusion (applying `state`/`claimer` to its node),
    /// the conclusion's negation (stateless, so con lookups always succeed),
    /// and every premise and exception. Fails with
    /// [`GraphError::DuplicateArgument`] if an argument with the same id is
    /// already present.
    pub fn add_argument(
        &mut self,
        argument: Argument,
        state: Option<NodeState>,
        claimer: Option<Actor>,
    ) -> GraphResult<()> {
        if self.arg_index.contains_key(argument.id()) {
            return Err(GraphError::DuplicateArgument {
                arg_id: argument.id().to_string(),
            });
        }

        let arg_idx = self.arg_nodes.len();
        let conclusion = argument.conclusion().clone();

        let concl_idx = self.add_proposition(conclusion.clone(), state);
        if state.is_some() {
            self.prop_nodes[concl_idx].state = state;
        }
        if claimer.is_some() {
            self.prop_nodes[concl_idx].claimer = claimer;
        }
        self.add_proposition(conclusion.negate(), None);

        self.edges.push(EdgeRecord {
            source: NodeRef::Prop(concl_idx),
            target: NodeRef::Arg(arg_idx),
            is_exception: false,
        });

        for premise in argument.premises() {
            let idx = self.add_proposition(premise.clone(), None);
            self.edges.push(EdgeRecord {
                source: NodeRef::Arg(arg_idx),
                target: NodeRef::Prop(idx),
                is_exception: false,
            });
        }
        for exception in argument.exceptions() {
            let idx = self.add_proposition(exception.clone(), None);
            self.edges.push(EdgeRecord {
                source: NodeRef::Arg(arg_idx),
                target: NodeRef::Prop(idx),
                is_exception: true,
            });
        }

        debug!(arg_id = %argument.id(), conclusion = %conclusion, "added argument node");
        self.arg_index.insert(argument.id().to_string(), arg_idx);
        self.support.entry(conclusion).or_default().push(arg_idx);
        self.arg_nodes.push(ArgNode { argument, claimer });
        Ok(())
    }

    /// All arguments whose conclusion is exactly `proposition`.
    ///
    /// Polarity-sensitive: arguments for a proposition and for its negation
    /// are disjoint result sets. Fails with
    /// [`GraphError::PropositionNotFound`] if the proposition was never
    /// added; a proposition that is present but unsupported yields an empty
    /// list instead.
    pub fn get_arguments(&self, proposition: &PropLiteral) -> GraphResult<Vec<&Argument>> {
        if !self.prop_index.contains_key(proposition) {
            return Err(GraphError::PropositionNotFound {
                proposition: proposition.to_string(),
            });
        }
        Ok(self
            .support
            .get(proposition)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.arg_nodes[i].argument)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// All arguments con `proposition`, i.e. pro its negation.
    pub fn get_arguments_con(&self, proposition: &PropLiteral) -> GraphResult<Vec<&Argument>> {
        self.get_arguments(&proposition.negate())
    }

    /// All arguments whose conclusion node currently has the given state,
    /// in insertion order.
    pub fn get_arguments_by_status(&self, state: NodeState) -> Vec<&Argument> {
        self.arg_nodes
            .iter()
            .filter(|node| {
                self.prop_index
                    .get(node.argument.conclusion())
                    .map(|&i| self.prop_nodes[i].state == Some(state))
                    .unwrap_or(false)
            })
            .map(|node| &node.argument)
            .collect()
    }

    /// Update the claim state of a proposition node.
    ///
    /// Only the named proposition is touched; arguments for other
    /// conclusions are unaffected.
    pub fn set_status(&mut self, conclusion: &PropLiteral, state: NodeState) -> GraphResult<()> {
        let idx = self.prop_index.get(conclusion).copied().ok_or_else(|| {
            GraphError::PropositionNotFound {
                proposition: conclusion.to_string(),
            }
        })?;
        self.prop_nodes[idx].state = Some(state);
        Ok(())
    }

    /// The claim state of a proposition node, if the node exists.
    pub fn status_of(&self, proposition: &PropLiteral) -> GraphResult<Option<NodeState>> {
        let idx = self.prop_index.get(proposition).copied().ok_or_else(|| {
            GraphError::PropositionNotFound {
                proposition: proposition.to_string(),
            }
        })?;
        Ok(self.prop_nodes[idx].state)
    }

    /// Whether an argument with this id is present.
    pub fn contains_argument(&self, arg_id: &str) -> bool {
        self.arg_index.contains_key(arg_id)
    }

    /// Whether a proposition node is present.
    pub fn contains_proposition(&self, proposition: &PropLiteral) -> bool {
        self.prop_index.contains_key(proposition)
    }

    /// The de-duplicated proposition labels present in the graph.
    pub fn propositions(&self) -> impl Iterator<Item = &PropLiteral> {
        self.prop_nodes.iter().map(|node| &node.prop)
    }

    /// All arguments, in insertion order.
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arg_nodes.iter().map(|node| &node.argument)
    }

    /// Produce the consumable node/edge listing of this graph.
    pub fn export(&self) -> GraphExport {
        let arg_base = self.prop_nodes.len();
        let node_id = |r: NodeRef| match r {
            NodeRef::Prop(i) => i,
            NodeRef::Arg(i) => arg_base + i,
        };

        let mut nodes = Vec::with_capacity(self.prop_nodes.len() + self.arg_nodes.len());
        for (i, node) in self.prop_nodes.iter().enumerate() {
            nodes.push(ExportNode {
                id: i,
                kind: ExportNodeKind::Proposition,
                label: node.prop.to_string(),
                state: node.state,
                claimer: node.claimer,
                weight: None,
            });
        }
        for (i, node) in self.arg_nodes.iter().enumerate() {
            nodes.push(ExportNode {
                id: arg_base + i,
                kind: ExportNodeKind::Argument,
                label: node.argument.id().to_string(),
                state: None,
                claimer: node.claimer,
                weight: Some(node.argument.weight()),
            });
        }

        let edges = self
            .edges
            .iter()
            .map(|e| ExportEdge {
                source: node_id(e.source),
                target: node_id(e.target),
                is_exception: e.is_exception,
            })
            .collect();

        GraphExport { nodes, edges }
    }
}

// ============================================================================
// Export types
// ============================================================================

/// Kind of an exported node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportNodeKind {
    /// A proposition node, labeled by its literal.
    Proposition,
    /// An argument node, labeled by its id.
    Argument,
}

/// One node of the consumable graph listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportNode {
    /// Stable id within this export.
    pub id: usize,
    /// Node kind.
    pub kind: ExportNodeKind,
    /// Literal rendering or argument id.
    pub label: String,
    /// Claim state, for proposition nodes in a dialogue graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<NodeState>,
    /// Claiming party, when the node was introduced during a dialogue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimer: Option<Actor>,
    /// Intrinsic weight, for argument nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// One edge of the consumable graph listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEdge {
    /// Source node id.
    pub source: usize,
    /// Target node id.
    pub target: usize,
    /// True for argument -> exception edges.
    pub is_exception: bool,
}

/// Node/edge listing of an [`ArgumentGraph`], consumable for visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    /// All nodes, propositions first.
    pub nodes: Vec<ExportNode>,
    /// All edges.
    pub edges: Vec<ExportEdge>,
}
