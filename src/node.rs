//! Node execution contracts for the stagecraft workflow engine.
//!
//! This module defines the two async traits at the engine's seam:
//! [`NodeRunner`], the collaborator the executor drives, and
//! [`NodeHandler`], the per-node callable a registry dispatches to, plus
//! the [`NodeError`] type that flows back from both.

use async_trait::async_trait;
use miette::Diagnostic;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::context::RunContext;

// ============================================================================
// Core Traits
// ============================================================================

/// Collaborator that executes a single node by id.
///
/// The executor knows nothing about how node code is loaded or dispatched;
/// it hands the runner a node id, the shared run context, and the resolved
/// input, and awaits an output. The canonical implementation is
/// [`NodeRegistry`](crate::executor::NodeRegistry), but tests and embedders
/// routinely implement this trait directly.
///
/// # Design Principles
///
/// - **Stateless per call**: the runner may be invoked concurrently for
///   every node of a stage, and concurrently across independent runs
/// - **Fallible, not fatal**: an `Err` is recorded against the node and
///   handled by the executor's retry/fail-fast policy, never propagated as
///   a panic or a hard failure of the run
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::{Value, json};
/// use stagecraft::context::RunContext;
/// use stagecraft::node::{NodeError, NodeRunner};
///
/// struct Uppercase;
///
/// #[async_trait]
/// impl NodeRunner for Uppercase {
///     async fn run(
///         &self,
///         _node_id: &str,
///         _ctx: &RunContext,
///         input: Value,
///     ) -> Result<Value, NodeError> {
///         let text = input.as_str().unwrap_or_default();
///         Ok(json!(text.to_uppercase()))
///     }
/// }
/// ```
#[async_trait]
pub trait NodeRunner: Send + Sync {
    /// Execute the node identified by `node_id` with the given context and
    /// resolved input.
    async fn run(
        &self,
        node_id: &str,
        ctx: &RunContext,
        input: Value,
    ) -> Result<Value, NodeError>;
}

/// A single loaded node: the `(context, input) -> output` contract.
///
/// Handlers are what a [`NodeRegistry`](crate::executor::NodeRegistry)
/// stores. Unlike [`NodeRunner`], a handler is already bound to one node and
/// does not receive the node id.
#[async_trait]
pub trait NodeHandler: Send + Sync {
    /// Run the node against the shared context and its resolved input.
    async fn call(&self, ctx: &RunContext, input: Value) -> Result<Value, NodeError>;
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors surfaced by node execution.
///
/// These are recoverable at the run level: the executor retries per policy
/// and then records the final error string against the node id in the
/// result's `errors` map.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    /// The runner has no implementation registered for the node id.
    #[error("no handler registered for node \"{node_id}\"")]
    #[diagnostic(
        code(stagecraft::node::missing_handler),
        help("Register the node before executing, or reload the registry.")
    )]
    MissingHandler { node_id: String },

    /// The node did not settle within the executor's configured timeout.
    ///
    /// Produced by the executor, not by runners; distinguishable from a
    /// node's own failure and carries the configured duration.
    #[error("node \"{node_id}\" timed out after {}ms", .timeout.as_millis())]
    #[diagnostic(
        code(stagecraft::node::timeout),
        help("Raise the executor timeout or make the node settle faster.")
    )]
    Timeout { node_id: String, timeout: Duration },

    /// The node itself failed with a message.
    #[error("{0}")]
    #[diagnostic(code(stagecraft::node::failed))]
    Failed(String),

    /// JSON serialization/deserialization error while producing or
    /// consuming node data.
    #[error(transparent)]
    #[diagnostic(code(stagecraft::node::serde_json))]
    Serde(#[from] serde_json::Error),
}
