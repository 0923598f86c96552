//! In-memory telemetry: event recording, aggregate counters, snapshots.
//!
//! The engine's observability surface is a single [`TelemetrySink`] trait
//! with two implementations: [`RingSink`], a fixed-capacity ring buffer
//! with unbounded running counters, and [`NoopSink`], used when telemetry
//! is disabled. The executor records node lifecycle events
//! (`node-start`, `node-complete`, `node-error`); trigger plumbing brackets
//! each run with `request-in` / `request-out` so the sink can classify
//! completed runs; an external health-check collaborator reads
//! [`snapshot`](TelemetrySink::snapshot).
//!
//! Sinks are selected by name through [`sink_for`], defaulting to the ring
//! buffer for any unrecognized or absent selector.
//!
//! # Examples
//!
//! ```
//! use stagecraft::telemetry::{TelemetryEvent, TelemetrySink, sink_for};
//!
//! let sink = sink_for(None); // ring buffer by default
//! sink.record(TelemetryEvent::engine_start("pr-digest"));
//! sink.record(TelemetryEvent::node_start("fetch"));
//! sink.record(TelemetryEvent::node_complete("fetch", 42));
//!
//! let snap = sink.snapshot();
//! assert_eq!(snap.total_events, 3);
//! assert_eq!(snap.error_count, 0);
//! assert_eq!(snap.recent_events.len(), 3);
//! ```

mod event;
mod sink;

use std::sync::Arc;

pub use event::{TelemetryEvent, TelemetryEventKind};
pub use sink::{NoopSink, RING_CAPACITY, RingSink, TelemetrySink};

/// Select a sink implementation by name.
///
/// `"noop"` disables telemetry; anything else, including `None`, yields a
/// [`RingSink`], so an unset or misspelled selector still records.
#[must_use]
pub fn sink_for(kind: Option<&str>) -> Arc<dyn TelemetrySink> {
    match kind {
        Some("noop") => Arc::new(NoopSink),
        _ => Arc::new(RingSink::new()),
    }
}

/// Select a sink from the `STAGECRAFT_TELEMETRY_SINK` environment variable
/// (loaded via `.env` when present).
#[must_use]
pub fn sink_from_env() -> Arc<dyn TelemetrySink> {
    dotenvy::dotenv().ok();
    let kind = std::env::var("STAGECRAFT_TELEMETRY_SINK").ok();
    sink_for(kind.as_deref())
}
