//! Retry with a fixed delay schedule for transient stats failures.

use std::future::Future;
use std::time::Duration;

use legm_core::error::StatsError;

/// How many times to try, and how long to wait between tries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Wait before retry N is `delays[N - 1]`, the last entry repeating
    pub delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delays: vec![Duration::from_secs(1), Duration::from_secs(3)],
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delays: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delays,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Vec::new())
    }

    fn delay_before(&self, retry: usize) -> Duration {
        self.delays
            .get(retry)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or_default()
    }
}

/// Run `op` until it succeeds, fails with a non-transient error, or the
/// attempts run out. Only [`StatsError::is_transient`] errors are retried.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, StatsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StatsError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < attempts => {
                let delay = policy.delay_before((attempt - 1) as usize);
                tracing::warn!(
                    label,
                    attempt,
                    max_attempts = attempts,
                    ?delay,
                    error = %e,
                    "Stats request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
