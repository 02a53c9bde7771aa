//! Bounded-wait polling.
//!
//! Every interaction in the element access layer goes through [`poll_until`]:
//! a condition is evaluated repeatedly until it yields a value or the timeout
//! elapses. A timed-out wait is reported as a [`WaitResult`] without a value;
//! the caller decides which error that becomes. Condition errors abort the wait
//! immediately. There is exactly one polling window per call and no
//! whole-operation retry.

use crate::result::StorefrontResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default explicit wait for element operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default implicit wait applied to every raw lookup (5 seconds)
pub const DEFAULT_IMPLICIT_WAIT_MS: u64 = 5_000;

/// Lower bound on the sleep between checks
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Result of a wait operation
#[derive(Debug, Clone)]
pub struct WaitResult<T> {
    /// Value produced by the condition, `None` if the wait timed out
    pub value: Option<T>,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the condition ran
    pub polls: u32,
}

impl<T> WaitResult<T> {
    /// Whether the condition was met before the timeout
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.value.is_some()
    }
}

/// Poll `condition` until it yields `Some`, an error, or `options` times out.
///
/// The condition always runs at least once, even with a zero timeout.
pub async fn poll_until<T, F, Fut>(
    options: &WaitOptions,
    mut condition: F,
) -> StorefrontResult<WaitResult<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StorefrontResult<Option<T>>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let mut polls = 0;

    loop {
        polls += 1;
        if let Some(value) = condition().await? {
            return Ok(WaitResult {
                value: Some(value),
                elapsed: start.elapsed(),
                polls,
            });
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            tracing::debug!(polls, elapsed_ms = elapsed.as_millis() as u64, "wait expired");
            return Ok(WaitResult {
                value: None,
                elapsed,
                polls,
            });
        }

        let pause = options
            .poll_interval()
            .min(timeout - elapsed)
            .max(MIN_POLL_INTERVAL);
        tokio::time::sleep(pause).await;
    }
}
