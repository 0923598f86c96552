//! The staged execution engine.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::instrument;

use crate::context::RunContext;
use crate::executor::config::ExecutorConfig;
use crate::executor::report::{ExecutionResult, ExecutionTiming, NodeTiming};
use crate::node::{NodeError, NodeRunner};
use crate::plan::ExecutionPlan;
use crate::telemetry::{NoopSink, TelemetryEvent, TelemetrySink};
use crate::utils::id_generator::IdGenerator;

/// Terminal state of one node within a run.
struct NodeOutcome {
    node_id: String,
    result: Result<Value, String>,
    timing: NodeTiming,
}

/// Executes compiled plans stage by stage.
///
/// The executor holds no per-run state: `execute` takes `&self` and builds
/// everything it needs locally, so one instance can be shared across
/// concurrently arriving triggers. The only shared mutable state is the
/// injected [`TelemetrySink`], whose contract is concurrency-safe.
///
/// One plan, many runs:
///
/// ```
/// use serde_json::json;
/// use stagecraft::context::RunContext;
/// use stagecraft::executor::{ExecutorConfig, StagedExecutor};
/// use stagecraft::graph::compile;
/// use stagecraft::types::WorkflowGraph;
/// # use async_trait::async_trait;
/// # use serde_json::Value;
/// # use stagecraft::node::{NodeError, NodeRunner};
/// # struct Echo;
/// # #[async_trait]
/// # impl NodeRunner for Echo {
/// #     async fn run(&self, node_id: &str, _ctx: &RunContext, _input: Value)
/// #     -> Result<Value, NodeError> {
/// #         Ok(json!({ "id": node_id }))
/// #     }
/// # }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let plan = compile(WorkflowGraph::builder("wf").node("a", "./a.ts").build()).unwrap();
/// let executor = StagedExecutor::new(ExecutorConfig::default());
/// let ctx = RunContext::builder("wf").build();
///
/// let first = executor.execute(&plan, &Echo, &ctx, Some(json!({ "n": 1 }))).await;
/// let second = executor.execute(&plan, &Echo, &ctx, Some(json!({ "n": 2 }))).await;
/// assert!(first.success && second.success);
/// assert_ne!(first.run_id, second.run_id);
/// # }
/// ```
pub struct StagedExecutor {
    config: ExecutorConfig,
    sink: Arc<dyn TelemetrySink>,
    ids: IdGenerator,
}

impl StagedExecutor {
    /// Executor with the given policy and telemetry disabled.
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_sink(config, Arc::new(NoopSink))
    }

    /// Executor that records node lifecycle events into `sink`.
    pub fn with_sink(config: ExecutorConfig, sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            config,
            sink,
            ids: IdGenerator::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run a compiled plan to completion (or to its first failed stage).
    ///
    /// Stages run in order; within a stage every node runs concurrently,
    /// bounded by [`ExecutorConfig::max_concurrency`]. The stage boundary is
    /// a barrier: all nodes settle before the next stage is considered, and
    /// if any failed, no later stage starts.
    ///
    /// Inputs resolve from upstream outputs: a node with no predecessors
    /// receives `initial_input` (or `{}` if none was given), a node with one
    /// predecessor receives that predecessor's output directly, and a
    /// fan-in node receives a map keyed by predecessor id.
    ///
    /// Node failures are captured in the returned result, never propagated;
    /// `execute` itself cannot fail.
    #[instrument(
        skip_all,
        fields(workflow = %plan.workflow_name())
    )]
    pub async fn execute(
        &self,
        plan: &ExecutionPlan,
        runner: &dyn NodeRunner,
        ctx: &RunContext,
        initial_input: Option<Value>,
    ) -> ExecutionResult {
        let run_id = self.ids.generate_run_id();
        let started_at = Utc::now();
        tracing::info!(run_id = %run_id, "workflow run started");

        let dependencies = plan.dependencies();
        let initial = initial_input.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));

        let mut outputs: FxHashMap<String, Value> = FxHashMap::default();
        let mut errors: FxHashMap<String, String> = FxHashMap::default();
        let mut node_timings: FxHashMap<String, NodeTiming> = FxHashMap::default();

        for (stage_index, stage) in plan.stages().iter().enumerate() {
            tracing::debug!(
                run_id = %run_id,
                stage = stage_index,
                nodes = stage.nodes.len(),
                "stage started"
            );

            let node_futures: Vec<_> = stage
                .nodes
                .iter()
                .map(|node_id| {
                    let input = resolve_input(node_id, &dependencies, &outputs, &initial);
                    self.run_node(node_id, runner, ctx, input, Arc::clone(&semaphore))
                })
                .collect();

            // Stage barrier: every sibling settles before results are merged.
            let mut stage_failed = false;
            for outcome in join_all(node_futures).await {
                node_timings.insert(outcome.node_id.clone(), outcome.timing);
                match outcome.result {
                    Ok(value) => {
                        outputs.insert(outcome.node_id, value);
                    }
                    Err(message) => {
                        stage_failed = true;
                        errors.insert(outcome.node_id, message);
                    }
                }
            }

            if stage_failed {
                tracing::warn!(
                    run_id = %run_id,
                    stage = stage_index,
                    "stage failed, halting before later stages"
                );
                break;
            }
        }

        let completed_at = Utc::now();
        let success = errors.is_empty();
        tracing::info!(
            run_id = %run_id,
            success,
            nodes_completed = outputs.len(),
            nodes_failed = errors.len(),
            "workflow run finished"
        );

        ExecutionResult {
            run_id,
            success,
            outputs,
            errors,
            timing: ExecutionTiming {
                started_at,
                completed_at,
                duration_ms: (completed_at - started_at).num_milliseconds().max(0) as u64,
                node_timings,
            },
        }
    }

    /// Drive one node to a terminal state: attempts, timeout, backoff.
    ///
    /// The concurrency permit is held per attempt, not per node, so a node
    /// sleeping through a backoff delay does not starve queued siblings.
    /// Dropping the timed-out attempt future is the one-shot completion
    /// gate: a result that arrives after the deadline has nowhere to land.
    async fn run_node(
        &self,
        node_id: &str,
        runner: &dyn NodeRunner,
        ctx: &RunContext,
        input: Value,
        semaphore: Arc<Semaphore>,
    ) -> NodeOutcome {
        let started_at = Utc::now();
        self.sink.record(TelemetryEvent::node_start(node_id));

        let mut settled: Result<Value, NodeError> = Err(NodeError::Failed(String::new()));
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self
                    .config
                    .base_delay
                    .saturating_mul(2u32.saturating_pow(attempt - 1));
                tokio::time::sleep(delay).await;
            }

            let permit = semaphore
                .acquire()
                .await
                .expect("execution semaphore is never closed");
            let attempt_result =
                match tokio::time::timeout(self.config.timeout, runner.run(node_id, ctx, input.clone()))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(NodeError::Timeout {
                        node_id: node_id.to_string(),
                        timeout: self.config.timeout,
                    }),
                };
            drop(permit);

            match attempt_result {
                Ok(value) => {
                    settled = Ok(value);
                    break;
                }
                Err(err) => {
                    tracing::warn!(
                        node = node_id,
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %err,
                        "node attempt failed"
                    );
                    settled = Err(err);
                }
            }
        }

        let completed_at = Utc::now();
        let timing = NodeTiming::measure(started_at, completed_at);
        let result = match settled {
            Ok(value) => {
                self.sink
                    .record(TelemetryEvent::node_complete(node_id, timing.duration_ms));
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                self.sink.record(TelemetryEvent::node_error(
                    node_id,
                    &message,
                    timing.duration_ms,
                ));
                Err(message)
            }
        };

        NodeOutcome {
            node_id: node_id.to_string(),
            result,
            timing,
        }
    }
}

/// Resolve a node's input from its predecessors' outputs.
///
/// No predecessors: the run's initial input. One predecessor: that output,
/// unwrapped. Several: a keyed map predecessor-id -> output, never a
/// positional concatenation.
fn resolve_input(
    node_id: &str,
    dependencies: &FxHashMap<&str, Vec<&str>>,
    outputs: &FxHashMap<String, Value>,
    initial: &Value,
) -> Value {
    match dependencies.get(node_id).map(Vec::as_slice) {
        None | Some([]) => initial.clone(),
        Some([only]) => outputs.get(*only).cloned().unwrap_or(Value::Null),
        Some(predecessors) => {
            let mut merged = serde_json::Map::with_capacity(predecessors.len());
            for predecessor in predecessors {
                merged.insert(
                    (*predecessor).to_string(),
                    outputs.get(*predecessor).cloned().unwrap_or(Value::Null),
                );
            }
            Value::Object(merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_resolution_covers_zero_one_and_many_predecessors() {
        let mut dependencies: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        dependencies.insert("single", vec!["a"]);
        dependencies.insert("merge", vec!["a", "b"]);

        let mut outputs: FxHashMap<String, Value> = FxHashMap::default();
        outputs.insert("a".into(), json!({ "from": "a" }));
        outputs.insert("b".into(), json!([1, 2]));

        let initial = json!({ "seed": true });

        assert_eq!(
            resolve_input("root", &dependencies, &outputs, &initial),
            initial
        );
        assert_eq!(
            resolve_input("single", &dependencies, &outputs, &initial),
            json!({ "from": "a" })
        );
        assert_eq!(
            resolve_input("merge", &dependencies, &outputs, &initial),
            json!({ "a": { "from": "a" }, "b": [1, 2] })
        );
    }
}
