//! Graph validation and compilation into staged execution plans.
//!
//! Compilation is all-or-nothing: any validation failure aborts with a
//! [`CompileError`] and no partial plan is ever produced.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::plan::{ExecutionPlan, Stage};
use crate::types::WorkflowGraph;

/// Errors produced while validating and compiling a workflow graph.
///
/// Each variant corresponds to one validation phase, and carries the
/// offending node or edge so callers can report actionable messages.
#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    /// The workflow has no name.
    #[error("workflow is missing a name")]
    #[diagnostic(
        code(stagecraft::compile::missing_name),
        help("Set the `name` field of the workflow description.")
    )]
    MissingName,

    /// The workflow declares no nodes.
    #[error("workflow \"{workflow}\" declares no nodes")]
    #[diagnostic(
        code(stagecraft::compile::empty_workflow),
        help("Declare at least one node before compiling.")
    )]
    EmptyWorkflow { workflow: String },

    /// An edge references a node id that was never declared.
    #[error("edge {from} -> {to} references undeclared node \"{missing}\"")]
    #[diagnostic(
        code(stagecraft::compile::unknown_node),
        help("Every edge endpoint must name a declared node.")
    )]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },

    /// An edge connects a node to itself.
    #[error("self-loop on node \"{node}\"")]
    #[diagnostic(
        code(stagecraft::compile::self_loop),
        help("A node cannot depend on its own output.")
    )]
    SelfLoop { node: String },

    /// The edge set contains a cycle, so no execution order exists.
    #[error("cycle detected in workflow graph involving nodes {nodes:?}")]
    #[diagnostic(
        code(stagecraft::compile::cycle),
        help("Remove at least one edge from the cycle so the graph becomes a DAG.")
    )]
    Cycle { nodes: Vec<String> },
}

/// Compile a workflow graph into an executable plan of parallel stages.
///
/// Validation runs in a fixed order, each phase with its own error kind:
/// structural checks, edge referential integrity, self-loop rejection, and
/// finally cycle detection via Kahn's algorithm. The topological order that
/// Kahn's algorithm produces doubles as the deterministic tie-break for
/// stage membership: whenever several nodes are ready at once, the smallest
/// node id (lexicographically) is taken first, so plans are reproducible
/// regardless of map iteration order.
///
/// Stage assignment places every node in the earliest stage consistent with
/// its dependencies: `stage(n) = max(stage(p) + 1)` over direct
/// predecessors `p`, defaulting to stage 0. A graph with nodes but no edges
/// therefore compiles to a single stage holding every node.
///
/// # Errors
///
/// Returns a [`CompileError`] describing the first validation failure.
/// There is no partial or best-effort compilation.
pub fn compile(graph: WorkflowGraph) -> Result<ExecutionPlan, CompileError> {
    validate_structure(&graph)?;
    validate_edges(&graph)?;
    let node_order = topological_sort(&graph)?;
    let stages = assign_stages(&graph, &node_order);

    tracing::debug!(
        workflow = %graph.name,
        nodes = node_order.len(),
        stages = stages.len(),
        "workflow compiled"
    );

    Ok(ExecutionPlan::new(graph, stages, node_order))
}

/// Required-field checks on the raw description.
fn validate_structure(graph: &WorkflowGraph) -> Result<(), CompileError> {
    if graph.name.is_empty() {
        return Err(CompileError::MissingName);
    }
    if graph.nodes.is_empty() {
        return Err(CompileError::EmptyWorkflow {
            workflow: graph.name.clone(),
        });
    }
    Ok(())
}

/// Every edge endpoint must name a declared node; self-loops are rejected
/// here, before cycle detection, so they get their own error kind.
fn validate_edges(graph: &WorkflowGraph) -> Result<(), CompileError> {
    for edge in &graph.edges {
        for endpoint in [&edge.from, &edge.to] {
            if !graph.nodes.contains_key(endpoint) {
                return Err(CompileError::UnknownNode {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
        if edge.from == edge.to {
            return Err(CompileError::SelfLoop {
                node: edge.from.clone(),
            });
        }
    }
    Ok(())
}

/// Kahn's algorithm with a lexicographic ready-queue.
///
/// The min-heap makes the produced order a pure function of the graph:
/// whenever more than one node has in-degree zero, the smallest id wins.
fn topological_sort(graph: &WorkflowGraph) -> Result<Vec<String>, CompileError> {
    let mut in_degree: FxHashMap<&str, usize> = FxHashMap::default();
    let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();

    for id in graph.nodes.keys() {
        in_degree.insert(id.as_str(), 0);
        adjacency.insert(id.as_str(), Vec::new());
    }

    for edge in &graph.edges {
        adjacency
            .get_mut(edge.from.as_str())
            .expect("edge endpoints validated")
            .push(edge.to.as_str());
        *in_degree
            .get_mut(edge.to.as_str())
            .expect("edge endpoints validated") += 1;
    }

    let mut ready: BinaryHeap<Reverse<&str>> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| Reverse(*id))
        .collect();

    let mut sorted: Vec<String> = Vec::with_capacity(graph.nodes.len());
    while let Some(Reverse(id)) = ready.pop() {
        sorted.push(id.to_string());
        for successor in &adjacency[id] {
            let degree = in_degree
                .get_mut(successor)
                .expect("edge endpoints validated");
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse(*successor));
            }
        }
    }

    if sorted.len() != graph.nodes.len() {
        let mut remaining: Vec<String> = in_degree
            .iter()
            .filter(|(_, degree)| **degree > 0)
            .map(|(id, _)| id.to_string())
            .collect();
        remaining.sort();
        return Err(CompileError::Cycle { nodes: remaining });
    }

    Ok(sorted)
}

/// Group topologically sorted nodes into stages.
///
/// Each node lands in the earliest stage strictly after all of its
/// dependencies, which maximizes the parallelism available to the executor.
fn assign_stages(graph: &WorkflowGraph, node_order: &[String]) -> Vec<Stage> {
    let deps = graph.dependency_map();
    let mut node_stage: FxHashMap<&str, usize> = FxHashMap::default();
    let mut stages: Vec<Stage> = Vec::new();

    for id in node_order {
        let stage_idx = deps
            .get(id.as_str())
            .map(|preds| {
                preds
                    .iter()
                    .map(|p| node_stage.get(p).copied().unwrap_or(0) + 1)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);

        node_stage.insert(id.as_str(), stage_idx);
        while stages.len() <= stage_idx {
            stages.push(Stage::default());
        }
        stages[stage_idx].nodes.push(id.clone());
    }

    stages
}
