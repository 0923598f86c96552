//! Fluent construction of workflow graphs.
//!
//! Most workflows arrive as deserialized documents; the builder exists for
//! hosts and tests that assemble graphs programmatically.

use rustc_hash::FxHashMap;

use crate::types::{Edge, NodeSpec, WorkflowGraph};

/// Builder for [`WorkflowGraph`] with a fluent API.
///
/// The builder performs no validation; structural checks (edge endpoints,
/// self-loops, cycles) happen in [`compile`](crate::graph::compile) so that
/// graphs built in code and graphs parsed from documents go through the
/// same gate.
///
/// # Examples
///
/// ```rust
/// use stagecraft::types::WorkflowGraph;
///
/// let graph = WorkflowGraph::builder("etl")
///     .node("extract", "./nodes/extract.ts")
///     .node("transform", "./nodes/transform.ts")
///     .node("load", "./nodes/load.ts")
///     .edge("extract", "transform")
///     .edge("transform", "load")
///     .build();
///
/// assert_eq!(graph.nodes.len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct WorkflowBuilder {
    name: String,
    nodes: FxHashMap<String, NodeSpec>,
    edges: Vec<Edge>,
}

impl WorkflowBuilder {
    /// Creates a new builder for a workflow with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: FxHashMap::default(),
            edges: Vec::new(),
        }
    }

    /// Declares a node with the given id and implementation path.
    ///
    /// Re-declaring an id replaces the earlier spec; ids stay unique by
    /// construction.
    #[must_use]
    pub fn node(mut self, id: impl Into<String>, path: impl Into<String>) -> Self {
        self.nodes.insert(id.into(), NodeSpec::new(path));
        self
    }

    /// Declares a node with a full [`NodeSpec`].
    #[must_use]
    pub fn node_spec(mut self, id: impl Into<String>, spec: NodeSpec) -> Self {
        self.nodes.insert(id.into(), spec);
        self
    }

    /// Adds a directed edge from one node to another.
    ///
    /// Multiple edges from the same node create fan-out; multiple edges to
    /// the same node create fan-in (the target receives a keyed map of
    /// predecessor outputs at execution time).
    #[must_use]
    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push(Edge::new(from, to));
        self
    }

    /// Finishes building, returning the graph description.
    #[must_use]
    pub fn build(self) -> WorkflowGraph {
        WorkflowGraph {
            name: self.name,
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
