//! Run identifier generation.
//!
//! Run ids correlate a single `execute` call across its log lines,
//! telemetry events, and the returned result. UUIDv4 keeps them unique
//! across concurrent runs and across processes without coordination.

use uuid::Uuid;

/// Generates correlation ids for workflow runs.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn new() -> Self {
        Self
    }

    /// A fresh run id, e.g. `run-7f9c0d6e-...`.
    #[must_use]
    pub fn generate_run_id(&self) -> String {
        format!("run-{}", Uuid::new_v4())
    }
}
