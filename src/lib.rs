//! # Stagecraft: Staged Workflow Engine
//!
//! Stagecraft compiles a declarative node/edge workflow description into an
//! immutable plan of parallel-safe stages and executes it with bounded
//! concurrency, per-node timeouts, retries with exponential backoff, and
//! in-memory telemetry.
//!
//! ## Core Concepts
//!
//! - **Nodes**: named units of work with an opaque implementation reference
//! - **Edges**: directed data dependencies; upstream outputs become
//!   downstream inputs
//! - **Plan**: the compiled, validated form of a workflow, an ordered list
//!   of stages, each a set of nodes safe to run concurrently
//! - **Executor**: walks the plan stage by stage against an injected
//!   [`NodeRunner`](node::NodeRunner) collaborator
//! - **Telemetry**: an append-only, bounded-memory event sink with aggregate
//!   counters and point-in-time snapshots
//!
//! ## Quick Start
//!
//! Compile once, execute many times (typically one run per incoming trigger):
//!
//! ```
//! use async_trait::async_trait;
//! use serde_json::{Value, json};
//! use stagecraft::context::RunContext;
//! use stagecraft::executor::{ExecutorConfig, StagedExecutor};
//! use stagecraft::graph::compile;
//! use stagecraft::node::{NodeError, NodeRunner};
//! use stagecraft::types::WorkflowGraph;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl NodeRunner for Echo {
//!     async fn run(
//!         &self,
//!         node_id: &str,
//!         _ctx: &RunContext,
//!         _input: Value,
//!     ) -> Result<Value, NodeError> {
//!         Ok(json!({ "id": node_id }))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let graph = WorkflowGraph::builder("fanout")
//!     .node("a", "./nodes/a.ts")
//!     .node("b", "./nodes/b.ts")
//!     .node("c", "./nodes/c.ts")
//!     .edge("a", "b")
//!     .edge("a", "c")
//!     .build();
//!
//! let plan = compile(graph).unwrap();
//!
//! let executor = StagedExecutor::new(ExecutorConfig::default());
//! let ctx = RunContext::builder("fanout").build();
//! let result = executor.execute(&plan, &Echo, &ctx, None).await;
//!
//! assert!(result.success);
//! assert_eq!(result.outputs["b"], json!({ "id": "b" }));
//! # }
//! ```
//!
//! ## Failure Handling
//!
//! Node-level failures never escape `execute`: each failed node is retried
//! per policy, then recorded in the result's `errors` map, and a failed
//! stage halts progression to later stages while its concurrent siblings
//! finish. Compilation, by contrast, is all-or-nothing: a cycle, self-loop,
//! or dangling edge aborts with a [`CompileError`](graph::CompileError) and
//! no partial plan is ever produced.
//!
//! ## Module Guide
//!
//! - [`types`] - Declarative workflow description (nodes, edges, graph)
//! - [`graph`] - Graph builder, validation, and compilation into stages
//! - [`plan`] - The immutable compiled plan consumed by the executor
//! - [`node`] - Node runner/handler contracts and execution errors
//! - [`executor`] - Staged execution engine, config, registry, and reports
//! - [`context`] - Opaque per-run execution context passed through to nodes
//! - [`telemetry`] - Event sink contracts, ring-buffer sink, and snapshots

pub mod context;
pub mod executor;
pub mod graph;
pub mod node;
pub mod plan;
pub mod telemetry;
pub mod types;
pub mod utils;
