//! Registry mapping node ids to loaded handlers.
//!
//! The registry is the engine's stand-in for a host's dynamic module
//! loader: the host loads node code however it likes (files, plugins,
//! embedded functions) and installs the resulting handlers here. Hot reload
//! is an atomic [`swap`](NodeRegistry::swap) of the whole table. Runs that
//! already resolved a handler keep executing the old one, and every
//! subsequent lookup sees the new table.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::context::RunContext;
use crate::node::{NodeError, NodeHandler, NodeRunner};

type HandlerTable = FxHashMap<String, Arc<dyn NodeHandler>>;

/// Thread-safe table of node handlers, usable as a [`NodeRunner`].
///
/// Lookups clone the handler's `Arc` and release the lock before awaiting,
/// so a slow node never blocks registration, and a [`swap`](Self::swap) or
/// [`clear`](Self::clear) never invalidates a handler mid-call.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use serde_json::{Value, json};
/// use stagecraft::context::RunContext;
/// use stagecraft::executor::NodeRegistry;
/// use stagecraft::node::{NodeError, NodeHandler};
///
/// struct Constant(i64);
///
/// #[async_trait]
/// impl NodeHandler for Constant {
///     async fn call(&self, _ctx: &RunContext, _input: Value) -> Result<Value, NodeError> {
///         Ok(json!(self.0))
///     }
/// }
///
/// let registry = NodeRegistry::new();
/// registry.register("answer", Arc::new(Constant(42)));
/// assert!(registry.contains("answer"));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Default)]
pub struct NodeRegistry {
    handlers: RwLock<Arc<HandlerTable>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or replaces the handler for one node id.
    pub fn register(&self, node_id: impl Into<String>, handler: Arc<dyn NodeHandler>) {
        let mut table = self.handlers.write().unwrap();
        Arc::make_mut(&mut *table).insert(node_id.into(), handler);
    }

    /// Atomically replaces the entire handler table.
    ///
    /// This is the hot-reload entry point: the host builds a fresh table
    /// from reloaded node code and swaps it in as one unit. In-flight calls
    /// holding handlers from the old table are unaffected.
    pub fn swap(&self, table: FxHashMap<String, Arc<dyn NodeHandler>>) {
        *self.handlers.write().unwrap() = Arc::new(table);
    }

    /// Removes every handler.
    pub fn clear(&self) {
        self.swap(FxHashMap::default());
    }

    #[must_use]
    pub fn contains(&self, node_id: &str) -> bool {
        self.handlers.read().unwrap().contains_key(node_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, node_id: &str) -> Option<Arc<dyn NodeHandler>> {
        self.handlers.read().unwrap().get(node_id).cloned()
    }
}

#[async_trait]
impl NodeRunner for NodeRegistry {
    async fn run(
        &self,
        node_id: &str,
        ctx: &RunContext,
        input: Value,
    ) -> Result<Value, NodeError> {
        match self.lookup(node_id) {
            Some(handler) => handler.call(ctx, input).await,
            None => Err(NodeError::MissingHandler {
                node_id: node_id.to_string(),
            }),
        }
    }
}
