//! Telemetry event types and constructors.

use std::fmt;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// What happened. Serialized in kebab-case so the wire names match the
/// engine's event vocabulary (`node-start`, `request-in`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TelemetryEventKind {
    /// Engine process came up.
    EngineStart,
    /// First attempt of a node is about to run.
    NodeStart,
    /// A node eventually succeeded.
    NodeComplete,
    /// A node failed terminally (retries exhausted).
    NodeError,
    /// A trigger began a run (webhook delivery, queue message, ...).
    RequestIn,
    /// A trigger finished its run.
    RequestOut,
    /// A message arrived on a queue subject.
    NatsMessage,
}

impl TelemetryEventKind {
    /// Wire name of the kind, e.g. `node-error`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetryEventKind::EngineStart => "engine-start",
            TelemetryEventKind::NodeStart => "node-start",
            TelemetryEventKind::NodeComplete => "node-complete",
            TelemetryEventKind::NodeError => "node-error",
            TelemetryEventKind::RequestIn => "request-in",
            TelemetryEventKind::RequestOut => "request-out",
            TelemetryEventKind::NatsMessage => "nats-message",
        }
    }
}

/// A single recorded event: kind, timestamp, and free-form metadata.
///
/// Events are written once into a sink and only ever read back from
/// snapshots. The executor emits `node-start` / `node-complete` /
/// `node-error`; the remaining kinds belong to the host (process bootstrap
/// and trigger plumbing).
///
/// # Examples
///
/// ```
/// use stagecraft::telemetry::{TelemetryEvent, TelemetryEventKind};
///
/// let event = TelemetryEvent::node_error("fetch", "connection refused", 230);
/// assert_eq!(event.kind, TelemetryEventKind::NodeError);
/// assert_eq!(event.node_id(), Some("fetch"));
/// assert_eq!(event.error(), Some("connection refused"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub kind: TelemetryEventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub metadata: FxHashMap<String, Value>,
}

impl TelemetryEvent {
    /// Event of the given kind, stamped now, with empty metadata.
    pub fn new(kind: TelemetryEventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            metadata: FxHashMap::default(),
        }
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn engine_start(workflow: impl Into<String>) -> Self {
        Self::new(TelemetryEventKind::EngineStart).with_metadata("workflow", json!(workflow.into()))
    }

    pub fn node_start(node_id: impl Into<String>) -> Self {
        Self::new(TelemetryEventKind::NodeStart).with_metadata("node_id", json!(node_id.into()))
    }

    pub fn node_complete(node_id: impl Into<String>, duration_ms: u64) -> Self {
        Self::new(TelemetryEventKind::NodeComplete)
            .with_metadata("node_id", json!(node_id.into()))
            .with_metadata("duration_ms", json!(duration_ms))
    }

    pub fn node_error(
        node_id: impl Into<String>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self::new(TelemetryEventKind::NodeError)
            .with_metadata("node_id", json!(node_id.into()))
            .with_metadata("error", json!(error.into()))
            .with_metadata("duration_ms", json!(duration_ms))
    }

    pub fn request_in() -> Self {
        Self::new(TelemetryEventKind::RequestIn)
    }

    pub fn request_out() -> Self {
        Self::new(TelemetryEventKind::RequestOut)
    }

    pub fn nats_message(subject: impl Into<String>) -> Self {
        Self::new(TelemetryEventKind::NatsMessage).with_metadata("subject", json!(subject.into()))
    }

    /// Node id from metadata, if this event concerns a node.
    #[must_use]
    pub fn node_id(&self) -> Option<&str> {
        self.metadata.get("node_id").and_then(Value::as_str)
    }

    /// Error text from metadata, if present.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.metadata.get("error").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == TelemetryEventKind::NodeError
    }
}

impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.node_id(), self.error()) {
            (Some(node), Some(error)) => {
                write!(f, "[{}] {node}: {error}", self.kind.as_str())
            }
            (Some(node), None) => write!(f, "[{}] {node}", self.kind.as_str()),
            _ => write!(f, "[{}]", self.kind.as_str()),
        }
    }
}
