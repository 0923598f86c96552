#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use stagecraft::context::RunContext;
use stagecraft::node::{NodeError, NodeRunner};
use tokio::time::{Duration, sleep};

/// Returns `{ "id": node_id }` for every node.
pub struct EchoRunner;

#[async_trait]
impl NodeRunner for EchoRunner {
    async fn run(
        &self,
        node_id: &str,
        _ctx: &RunContext,
        _input: Value,
    ) -> Result<Value, NodeError> {
        Ok(json!({ "id": node_id }))
    }
}

/// Echoes like [`EchoRunner`] but remembers the input each node received
/// and the order in which nodes started.
#[derive(Default)]
pub struct CapturingRunner {
    inputs: Mutex<FxHashMap<String, Value>>,
    started: Mutex<Vec<String>>,
    failing: Vec<String>,
}

impl CapturingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variant that fails the listed nodes with a fixed error.
    pub fn failing(nodes: &[&str]) -> Self {
        Self {
            failing: nodes.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn input_for(&self, node_id: &str) -> Option<Value> {
        self.inputs.lock().unwrap().get(node_id).cloned()
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeRunner for CapturingRunner {
    async fn run(&self, node_id: &str, _ctx: &RunContext, input: Value) -> Result<Value, NodeError> {
        self.started.lock().unwrap().push(node_id.to_string());
        self.inputs.lock().unwrap().insert(node_id.to_string(), input);
        if self.failing.iter().any(|n| n == node_id) {
            return Err(NodeError::Failed(format!("node {node_id} exploded")));
        }
        Ok(json!({ "id": node_id }))
    }
}

/// Fails the first `failures` attempts across all calls, then succeeds.
pub struct FlakyRunner {
    failures: u32,
    attempts: AtomicU32,
}

impl FlakyRunner {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeRunner for FlakyRunner {
    async fn run(
        &self,
        node_id: &str,
        _ctx: &RunContext,
        _input: Value,
    ) -> Result<Value, NodeError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(NodeError::Failed(format!("attempt {attempt} failed")));
        }
        Ok(json!({ "id": node_id, "attempt": attempt }))
    }
}

/// Never settles for the named node; echoes every other node.
pub struct StallingRunner {
    pub stall: &'static str,
}

#[async_trait]
impl NodeRunner for StallingRunner {
    async fn run(
        &self,
        node_id: &str,
        _ctx: &RunContext,
        _input: Value,
    ) -> Result<Value, NodeError> {
        if node_id == self.stall {
            futures_util::future::pending::<()>().await;
            unreachable!("pending future never resolves");
        }
        Ok(json!({ "id": node_id }))
    }
}

/// Sleeps a fixed delay per node, then echoes. `DelayedRunner` also tracks
/// how many nodes were running at once, for concurrency-bound assertions.
pub struct DelayedRunner {
    pub delay_ms: u64,
    active: AtomicU32,
    max_active: AtomicU32,
}

impl DelayedRunner {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            active: AtomicU32::new(0),
            max_active: AtomicU32::new(0),
        }
    }

    pub fn max_active(&self) -> u32 {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeRunner for DelayedRunner {
    async fn run(
        &self,
        node_id: &str,
        _ctx: &RunContext,
        _input: Value,
    ) -> Result<Value, NodeError> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        sleep(Duration::from_millis(self.delay_ms)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(json!({ "id": node_id }))
    }
}
