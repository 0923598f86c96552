#![allow(dead_code)]

use stagecraft::context::RunContext;
use stagecraft::graph::compile;
use stagecraft::plan::ExecutionPlan;
use stagecraft::types::WorkflowGraph;

pub fn test_context() -> RunContext {
    RunContext::builder("test-workflow").build()
}

/// Linear chain: a -> b -> c.
pub fn chain_plan() -> ExecutionPlan {
    compile(
        WorkflowGraph::builder("chain")
            .node("a", "./nodes/a.ts")
            .node("b", "./nodes/b.ts")
            .node("c", "./nodes/c.ts")
            .edge("a", "b")
            .edge("b", "c")
            .build(),
    )
    .expect("chain graph compiles")
}

/// Fan-out then fan-in: a -> {b, c} -> d.
pub fn diamond_plan() -> ExecutionPlan {
    compile(
        WorkflowGraph::builder("diamond")
            .node("a", "./nodes/a.ts")
            .node("b", "./nodes/b.ts")
            .node("c", "./nodes/c.ts")
            .node("d", "./nodes/d.ts")
            .edge("a", "b")
            .edge("a", "c")
            .edge("b", "d")
            .edge("c", "d")
            .build(),
    )
    .expect("diamond graph compiles")
}

/// Single root fanning out to two leaves: a -> b, a -> c.
pub fn fanout_plan() -> ExecutionPlan {
    compile(
        WorkflowGraph::builder("fanout")
            .node("a", "./nodes/a.ts")
            .node("b", "./nodes/b.ts")
            .node("c", "./nodes/c.ts")
            .edge("a", "b")
            .edge("a", "c")
            .build(),
    )
    .expect("fanout graph compiles")
}

/// One node, no edges.
pub fn single_node_plan(id: &str) -> ExecutionPlan {
    compile(
        WorkflowGraph::builder("single")
            .node(id, "./nodes/single.ts")
            .build(),
    )
    .expect("single-node graph compiles")
}
