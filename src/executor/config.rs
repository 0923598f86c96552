//! Executor tuning knobs.

use std::time::Duration;

/// Timeout, retry, and concurrency policy for a [`StagedExecutor`].
///
/// [`StagedExecutor`]: crate::executor::StagedExecutor
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stagecraft::executor::ExecutorConfig;
///
/// let config = ExecutorConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_max_retries(3);
///
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// assert_eq!(config.max_retries, 3);
/// ```
#[derive(Clone, Debug)]
pub struct ExecutorConfig {
    /// Deadline applied to every individual node attempt.
    pub timeout: Duration,
    /// Additional attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    /// Base delay for exponential backoff between attempts:
    /// `base_delay * 2^retry_index`.
    pub base_delay: Duration,
    /// Upper bound on concurrently running node attempts within a run.
    pub max_concurrency: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 0,
            base_delay: Duration::from_millis(100),
            max_concurrency: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl ExecutorConfig {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the concurrency bound; values below 1 are clamped to 1.
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }
}
