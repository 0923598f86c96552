//! Sink contract and the two implementations behind it.

use std::sync::Mutex;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::event::{TelemetryEvent, TelemetryEventKind};

/// Default ring buffer capacity, in events.
pub const RING_CAPACITY: usize = 1000;

/// Recorder of engine events with on-demand aggregate snapshots.
///
/// `record` is O(1), never blocks on I/O, never fails, and is safe to call
/// concurrently from every stage worker. `snapshot` is O(capacity), has no
/// side effects, and returns an immutable value.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: TelemetryEvent);
    fn snapshot(&self) -> TelemetrySnapshot;
}

/// Point-in-time aggregate view of a sink.
///
/// Recomputed per call, never persisted. `total_events` and `error_count`
/// are unbounded running counters: they keep counting long after the ring
/// buffer has wrapped, as do `last_error` / `last_error_at`, which always
/// reflect the most recent error even if its event has been evicted.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub total_events: u64,
    pub error_count: u64,
    /// `error_count / total_events`, `0.0` when nothing was recorded.
    pub error_rate: f64,
    /// Milliseconds since the sink was created.
    pub uptime_ms: u64,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    /// The most recent events, oldest first, at most the ring capacity.
    pub recent_events: Vec<TelemetryEvent>,
    /// Runs currently between `request-in` and `request-out`.
    pub in_flight: u64,
    /// Whether the most recently *completed* run recorded a node error.
    /// `false` before any run completes; unaffected by runs in progress.
    pub last_run_failed: bool,
}

/// Sink used when observability is disabled: recording is free and the
/// snapshot is all zeroes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn record(&self, _event: TelemetryEvent) {}

    fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::default()
    }
}

/// Mutable state behind the ring sink's lock.
#[derive(Debug, Default)]
struct RingState {
    total_events: u64,
    error_count: u64,
    last_error: Option<String>,
    last_error_at: Option<DateTime<Utc>>,
    buffer: Vec<TelemetryEvent>,
    /// Next write position once the buffer is full; equals the oldest
    /// entry's index at that point.
    cursor: usize,
    in_flight: u64,
    current_run_failed: bool,
    last_run_failed: bool,
}

/// Fixed-capacity ring buffer sink with running counters.
///
/// Writes wrap around, overwriting the oldest entry; the counters and the
/// last-error fields are independent of eviction. Run classification
/// correlates `request-in` / `request-out` pairs: a `node-error` recorded
/// while at least one run is in flight marks the current run failed, and
/// the mark is committed into `last_run_failed` when the in-flight counter
/// returns to zero.
///
/// # Examples
///
/// ```
/// use stagecraft::telemetry::{RingSink, TelemetryEvent, TelemetrySink};
///
/// let sink = RingSink::new();
/// sink.record(TelemetryEvent::request_in());
/// sink.record(TelemetryEvent::node_error("fetch", "boom", 12));
/// sink.record(TelemetryEvent::request_out());
///
/// let snap = sink.snapshot();
/// assert_eq!(snap.total_events, 3);
/// assert_eq!(snap.error_count, 1);
/// assert!(snap.last_run_failed);
/// assert_eq!(snap.in_flight, 0);
/// ```
pub struct RingSink {
    started_at: Instant,
    capacity: usize,
    state: Mutex<RingState>,
}

impl Default for RingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RingSink {
    /// Sink with the default capacity of [`RING_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(RING_CAPACITY)
    }

    /// Sink with an explicit buffer capacity; values below 1 are clamped.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            started_at: Instant::now(),
            capacity,
            state: Mutex::new(RingState {
                buffer: Vec::with_capacity(capacity),
                ..RingState::default()
            }),
        }
    }
}

impl TelemetrySink for RingSink {
    fn record(&self, event: TelemetryEvent) {
        let mut state = self.state.lock().unwrap();
        state.total_events += 1;

        match event.kind {
            TelemetryEventKind::NodeError => {
                state.error_count += 1;
                state.last_error = Some(event.error().unwrap_or_default().to_string());
                state.last_error_at = Some(event.timestamp);
                if state.in_flight > 0 {
                    state.current_run_failed = true;
                }
            }
            TelemetryEventKind::RequestIn => {
                state.in_flight += 1;
            }
            TelemetryEventKind::RequestOut => {
                if state.in_flight > 0 {
                    state.in_flight -= 1;
                    if state.in_flight == 0 {
                        state.last_run_failed = state.current_run_failed;
                        state.current_run_failed = false;
                    }
                }
            }
            _ => {}
        }

        if state.buffer.len() < self.capacity {
            state.buffer.push(event);
        } else {
            let cursor = state.cursor;
            state.buffer[cursor] = event;
        }
        state.cursor = (state.cursor + 1) % self.capacity;
    }

    fn snapshot(&self) -> TelemetrySnapshot {
        let state = self.state.lock().unwrap();

        // Oldest -> newest: before wrap the buffer is already in order,
        // after wrap the oldest entry sits at the cursor.
        let recent_events = if state.buffer.len() < self.capacity {
            state.buffer.clone()
        } else {
            let (wrapped, oldest_first) = state.buffer.split_at(state.cursor);
            oldest_first.iter().chain(wrapped.iter()).cloned().collect()
        };

        let error_rate = if state.total_events > 0 {
            state.error_count as f64 / state.total_events as f64
        } else {
            0.0
        };

        TelemetrySnapshot {
            total_events: state.total_events,
            error_count: state.error_count,
            error_rate,
            uptime_ms: self.started_at.elapsed().as_millis() as u64,
            last_error: state.last_error.clone(),
            last_error_at: state.last_error_at,
            recent_events,
            in_flight: state.in_flight,
            last_run_failed: state.last_run_failed,
        }
    }
}
