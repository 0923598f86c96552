//! Workflow graph construction and compilation.
//!
//! The main entry points are [`WorkflowBuilder`], a fluent API for
//! assembling a [`WorkflowGraph`](crate::types::WorkflowGraph) in code, and
//! [`compile`], which validates a graph and turns it into an immutable
//! [`ExecutionPlan`](crate::plan::ExecutionPlan) of parallel-safe stages.
//!
//! # Core Concepts
//!
//! - **Nodes**: named units of work with an opaque implementation reference
//! - **Edges**: directed data dependencies between nodes
//! - **Stages**: sets of nodes with no dependencies among each other,
//!   scheduled concurrently by the executor
//! - **Compilation**: validation (structure, edge integrity, self-loops,
//!   cycles) followed by deterministic topological ordering and stage
//!   assignment
//!
//! # Quick Start
//!
//! ```rust
//! use stagecraft::graph::compile;
//! use stagecraft::types::WorkflowGraph;
//!
//! let graph = WorkflowGraph::builder("fanout")
//!     .node("a", "./a.ts")
//!     .node("b", "./b.ts")
//!     .node("c", "./c.ts")
//!     .edge("a", "b")
//!     .edge("a", "c")
//!     .build();
//!
//! let plan = compile(graph).unwrap();
//! // "a" runs alone; "b" and "c" run in parallel once "a" settles.
//! assert_eq!(plan.stages().len(), 2);
//! assert_eq!(plan.stages()[0].nodes, vec!["a"]);
//! assert_eq!(plan.stages()[1].nodes, vec!["b", "c"]);
//! ```

mod builder;
mod compile;

pub use builder::WorkflowBuilder;
pub use compile::{CompileError, compile};
