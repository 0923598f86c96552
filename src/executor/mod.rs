//! Staged execution of compiled workflow plans.
//!
//! The executor walks an [`ExecutionPlan`](crate::plan::ExecutionPlan) stage
//! by stage: all nodes of a stage run concurrently (bounded by the
//! configured concurrency limit), and the stage boundary is a barrier: no
//! node of a later stage starts until every node of the current stage has
//! settled. A failed stage halts progression; concurrent siblings in that
//! stage finish and their results are recorded.
//!
//! Per node, the executor resolves the input from upstream outputs, applies
//! the configured timeout to every attempt, and retries failures with
//! exponential backoff. Node failures never escape
//! [`StagedExecutor::execute`]; they are collected in the returned
//! [`ExecutionResult`].
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use serde_json::{Value, json};
//! use stagecraft::context::RunContext;
//! use stagecraft::executor::{ExecutorConfig, NodeRegistry, StagedExecutor};
//! use stagecraft::graph::compile;
//! use stagecraft::node::{NodeError, NodeHandler};
//! use stagecraft::types::WorkflowGraph;
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl NodeHandler for Greet {
//!     async fn call(&self, _ctx: &RunContext, _input: Value) -> Result<Value, NodeError> {
//!         Ok(json!({ "greeting": "hello" }))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let plan = compile(
//!     WorkflowGraph::builder("greeter").node("greet", "./greet.ts").build(),
//! )
//! .unwrap();
//!
//! let registry = NodeRegistry::new();
//! registry.register("greet", Arc::new(Greet));
//!
//! let executor = StagedExecutor::new(ExecutorConfig::default().with_max_retries(2));
//! let ctx = RunContext::builder("greeter").build();
//! let result = executor.execute(&plan, &registry, &ctx, None).await;
//!
//! assert!(result.success);
//! assert_eq!(result.outputs["greet"], json!({ "greeting": "hello" }));
//! # }
//! ```

mod config;
mod registry;
mod report;
mod staged;

pub use config::ExecutorConfig;
pub use registry::NodeRegistry;
pub use report::{ExecutionResult, ExecutionTiming, NodeTiming};
pub use staged::StagedExecutor;
