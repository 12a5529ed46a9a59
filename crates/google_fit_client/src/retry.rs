use rand::{RngExt, rng};
use std::future::Future;
use std::time::Duration;

/// Exponential backoff with full jitter for dataset queries.
///
/// Transient provider hiccups get a couple of quick re-attempts before the
/// caller degrades the metric to its fallback path; the defaults stay small
/// so a dead provider does not stall the whole report.
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or the retry budget is spent, sleeping a
    /// jittered backoff between attempts. The last error is returned as-is.
    pub async fn retry_async<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut failures = 0u32;
        loop {
            let err = match op().await {
                Ok(v) => return Ok(v),
                Err(e) => e,
            };
            failures += 1;
            if failures > self.max_retries {
                return Err(err);
            }
            let cap = self.base_delay.saturating_mul(1 << failures);
            let wait = rng().random_range(0..=cap.as_millis() as u64);
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
    }
}
