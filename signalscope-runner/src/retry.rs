//! Retry policy for provider calls.
//!
//! Only errors whose kind is `RateLimited` are retried. Delay grows linearly
//! with the attempt number. Once the budget is spent the last error becomes
//! `DataError::RetriesExhausted`, which the batch reports as unavailable data.

use std::thread;
use std::time::Duration;

use signalscope_core::ErrorKind;

use crate::provider::DataError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// No retries, no sleeping.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget runs out. A budget of 0 still makes one attempt.
    pub fn run<T, F>(&self, ticker: &str, mut op: F) -> Result<T, DataError>
    where
        F: FnMut() -> Result<T, DataError>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.kind() != ErrorKind::RateLimited => return Err(err),
                Err(err) if attempt >= max_attempts => {
                    tracing::warn!(ticker, attempts = attempt, error = %err, "retry budget exhausted");
                    return Err(DataError::RetriesExhausted {
                        attempts: attempt,
                        last: err.to_string(),
                    });
                }
                Err(err) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        ticker,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "rate limited, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
