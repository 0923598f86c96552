//! Core types for the stagecraft workflow engine.
//!
//! This module defines the declarative description of a workflow: named
//! nodes, the directed edges between them, and the [`WorkflowGraph`] that
//! bundles both. These are the inputs to compilation; the compiled,
//! executable form lives in [`crate::plan`].
//!
//! A workflow description typically arrives as a deserialized document
//! (YAML or JSON parsed by the host), but can also be assembled in code
//! through [`WorkflowGraph::builder`].
//!
//! # Examples
//!
//! ```rust
//! use stagecraft::types::WorkflowGraph;
//!
//! let graph = WorkflowGraph::builder("pr-digest")
//!     .node("fetch", "./nodes/fetch.ts")
//!     .node("summarize", "./nodes/summarize.ts")
//!     .node("notify", "./nodes/notify.ts")
//!     .edge("fetch", "summarize")
//!     .edge("summarize", "notify")
//!     .build();
//!
//! assert_eq!(graph.name, "pr-digest");
//! assert_eq!(graph.nodes.len(), 3);
//! assert_eq!(graph.edges.len(), 2);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Declaration of a single workflow node.
///
/// The `path` is an opaque reference to the node's executable unit; the
/// engine never interprets it. Loading and dispatching the referenced code
/// is the node-runner collaborator's concern (see
/// [`NodeRegistry`](crate::executor::NodeRegistry)).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Opaque reference to the node's implementation.
    pub path: String,
    /// Capability grants for the node, passed through to the host loader.
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub capabilities: FxHashMap<String, String>,
}

impl NodeSpec {
    /// Create a spec pointing at the given implementation path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            capabilities: FxHashMap::default(),
        }
    }
}

/// A directed data dependency: the output of `from` feeds the input of `to`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Declarative workflow description: named nodes plus directed edges.
///
/// The graph is plain data. All structural guarantees (edge endpoints
/// exist, no self-loops, acyclic) are established by
/// [`compile`](crate::graph::compile), which consumes a graph and produces
/// an immutable [`ExecutionPlan`](crate::plan::ExecutionPlan).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkflowGraph {
    /// Workflow name, used in logs and error reports.
    pub name: String,
    /// Node declarations keyed by node id. Ids are unique by construction.
    pub nodes: FxHashMap<String, NodeSpec>,
    /// Directed edges between declared nodes.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl WorkflowGraph {
    /// Start building a workflow graph with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> crate::graph::WorkflowBuilder {
        crate::graph::WorkflowBuilder::new(name)
    }

    /// Direct predecessors of each node, derived from the edge list.
    ///
    /// Only nodes with at least one incoming edge appear as keys. Each
    /// predecessor list follows edge declaration order.
    #[must_use]
    pub fn dependency_map(&self) -> FxHashMap<&str, Vec<&str>> {
        let mut deps: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for edge in &self.edges {
            deps.entry(edge.to.as_str())
                .or_default()
                .push(edge.from.as_str());
        }
        deps
    }
}
