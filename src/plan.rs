//! Compiled execution plans.
//!
//! An [`ExecutionPlan`] is the immutable product of
//! [`compile`](crate::graph::compile): the validated graph, a deterministic
//! topological order, and the list of stages the executor walks. One plan
//! is compiled once per workflow definition and reused across many runs
//! (one per incoming trigger), so everything here is read-only and cheap to
//! share.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::types::WorkflowGraph;

/// A set of node ids with no dependencies among each other.
///
/// All nodes of a stage may run concurrently; every dependency of every
/// member lives in an earlier stage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub nodes: Vec<String>,
}

/// Validated, staged form of a workflow, ready for execution.
///
/// Fields are private: a plan can only be obtained from
/// [`compile`](crate::graph::compile), which is what lets the executor
/// trust its invariants without re-checking them per run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionPlan {
    graph: WorkflowGraph,
    stages: Vec<Stage>,
    node_order: Vec<String>,
}

impl ExecutionPlan {
    /// Internal (crate) factory; only the compiler constructs plans.
    pub(crate) fn new(graph: WorkflowGraph, stages: Vec<Stage>, node_order: Vec<String>) -> Self {
        Self {
            graph,
            stages,
            node_order,
        }
    }

    /// The workflow description this plan was compiled from.
    #[must_use]
    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Deterministic topological ordering of all node ids.
    #[must_use]
    pub fn node_order(&self) -> &[String] {
        &self.node_order
    }

    /// Name of the underlying workflow.
    #[must_use]
    pub fn workflow_name(&self) -> &str {
        &self.graph.name
    }

    /// Direct predecessors per node, derived from the retained edges.
    ///
    /// The executor builds this once per run to resolve node inputs from
    /// upstream outputs.
    #[must_use]
    pub fn dependencies(&self) -> FxHashMap<&str, Vec<&str>> {
        self.graph.dependency_map()
    }
}
