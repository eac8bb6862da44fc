//! Bounded retry with exponential backoff
//!
//! Wraps a single network operation: transient failures (timeouts, 5xx, 429)
//! are retried with capped exponential backoff plus jitter, permanent
//! failures are returned immediately without consuming attempts. Exhaustion
//! surfaces as `ExhaustedRetries` carrying the last observed error.

use homeward_common::{HomewardError, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default jitter factor applied to every backoff delay.
///
/// Spreads concurrent retriers apart so they do not resubmit in lockstep.
pub const DEFAULT_JITTER: f64 = 0.25;

/// Retry policy for a single network operation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt; 0 disables retrying.
    max_retries: u32,
    /// Base delay, doubled on each attempt.
    initial_delay: Duration,
    /// Cap on the computed delay.
    max_delay: Duration,
    /// Jitter factor (0.0 - 1.0) applied to the capped delay.
    jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            initial_delay: crate::config::DEFAULT_INITIAL_RETRY_DELAY,
            max_delay: crate::config::DEFAULT_MAX_RETRY_DELAY,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default jitter factor
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            jitter: DEFAULT_JITTER,
        }
    }

    /// Override the jitter factor (clamped to 0.0 - 1.0)
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Retries allowed after the initial attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Backoff delay before retry number `attempt + 1`
    ///
    /// Exponential (`initial × 2^attempt`), capped at `max_delay`. The jitter
    /// offset is derived from the attempt number via the golden ratio, which
    /// keeps delays spread without pulling in a randomness dependency and
    /// keeps tests reproducible.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        let capped = base.min(self.max_delay);

        if self.jitter <= 0.0 {
            return capped;
        }

        let range = capped.as_secs_f64() * self.jitter;
        let offset = (attempt as f64 * 0.618_033_988_749_895) % 1.0;
        let adjusted = capped.as_secs_f64() + range * (offset * 2.0 - 1.0);
        Duration::from_secs_f64(adjusted.max(0.0))
    }

    /// Execute `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// Makes at most `max_retries + 1` attempts. Each attempt is logged with
    /// its number and latency. `operation` names the call in log output.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;

        loop {
            let started = Instant::now();
            let result = op().await;
            let latency_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(value) => {
                    debug!(
                        operation,
                        attempt = attempt + 1,
                        latency_ms,
                        "Attempt succeeded"
                    );
                    return Ok(value);
                }
                Err(err) if err.is_transient() => {
                    if attempt >= self.max_retries {
                        warn!(
                            operation,
                            attempt = attempt + 1,
                            latency_ms,
                            error = %err,
                            "Attempt failed, retries exhausted"
                        );
                        return Err(HomewardError::ExhaustedRetries {
                            attempts: attempt + 1,
                            last: Box::new(err),
                        });
                    }

                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        latency_ms,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(
                        operation,
                        attempt = attempt + 1,
                        latency_ms,
                        error = %err,
                        "Attempt failed permanently"
                    );
                    return Err(err);
                }
            }
        }
    }
}
