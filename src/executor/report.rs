//! Result and timing types produced by a single run.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wall-clock timing of one node, recorded whether it succeeded or failed.
///
/// Covers the node's full occupancy of its stage slot: input resolution,
/// every attempt, and the backoff delays between attempts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeTiming {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl NodeTiming {
    pub(crate) fn measure(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds().max(0) as u64,
        }
    }
}

/// Timing of a whole run plus per-node breakdown.
///
/// Nodes that never started (a preceding stage failed) have no entry in
/// `node_timings`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionTiming {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub node_timings: FxHashMap<String, NodeTiming>,
}

/// Outcome of one `execute` call.
///
/// Always returned in full: node failures are captured here rather than
/// thrown. Each run's result is fully independent; the only state shared
/// between runs is the executor's telemetry sink.
///
/// Invariants:
/// - `success` is true iff `errors` is empty
/// - a node appears in `outputs` or `errors`, never both
/// - a node that never started (fail-fast cut its stage off) appears in
///   neither map
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Correlation id for this run, unique per `execute` call.
    pub run_id: String,
    pub success: bool,
    /// Output of every node that completed successfully.
    pub outputs: FxHashMap<String, Value>,
    /// Final error message of every node that failed terminally, keyed by
    /// node id.
    pub errors: FxHashMap<String, String>,
    pub timing: ExecutionTiming,
}

impl ExecutionResult {
    /// Output of a node, if it completed successfully.
    #[must_use]
    pub fn output(&self, node_id: &str) -> Option<&Value> {
        self.outputs.get(node_id)
    }

    /// Terminal error of a node, if it failed.
    #[must_use]
    pub fn error(&self, node_id: &str) -> Option<&str> {
        self.errors.get(node_id).map(String::as_str)
    }
}
