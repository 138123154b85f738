use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use super::errors::ApiError;

/// Retry behavior with exponential backoff for idempotent reads
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_attempts: u32,
    /// First retry waits this long
    pub base_delay_ms: u64,
    /// Caps exponential growth
    pub max_delay_ms: u64,
    /// Total budget for all attempts combined
    pub total_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5_000,
            total_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            max_delay_ms,
            ..Default::default()
        }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// min(base_delay * 2^attempt, max_delay)
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    /// Run `f` until it succeeds, fails permanently, or the budget is spent.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut f: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        let start_time = Instant::now();
        let mut last_error = None;

        for attempt in 0..=self.max_attempts {
            if start_time.elapsed() >= self.total_timeout {
                warn!(
                    "{}: Exceeded total timeout of {:?} after {} attempts",
                    operation_name, self.total_timeout, attempt
                );
                break;
            }

            if attempt > 0 {
                debug!(
                    "{}: Retry attempt {} of {}",
                    operation_name, attempt, self.max_attempts
                );
            }

            match f().await {
                Ok(result) => return Ok(result),
                Err(err) if !err.is_transient() => {
                    debug!("{}: Non-transient error, not retrying: {}", operation_name, err);
                    return Err(err);
                }
                Err(err) => {
                    debug!("{}: Transient error: {}", operation_name, err);
                    last_error = Some(err);

                    if attempt < self.max_attempts {
                        let delay = self.calculate_delay(attempt);
                        debug!("{}: Waiting {:?} before retry", operation_name, delay);
                        sleep(delay).await;
                    }
                }
            }
        }

        match last_error {
            Some(err) => {
                warn!(
                    "{}: All {} attempts failed, last error: {}",
                    operation_name,
                    self.max_attempts + 1,
                    err
                );
                Err(err)
            }
            None => Err(ApiError::Other(format!(
                "{}: All attempts failed with no error captured",
                operation_name
            ))),
        }
    }
}
