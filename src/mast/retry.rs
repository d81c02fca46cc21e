// src/mast/retry.rs
use std::future::Future;
use std::time::Duration;

use anyhow::Result;

pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Retry budget for one archive call: `retries` extra attempts after the
/// first, sleeping `backoff^n` seconds after the n-th failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: f64,
}

impl RetryPolicy {
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            backoff: DEFAULT_BACKOFF_FACTOR,
        }
    }

    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        Duration::from_secs_f64(self.backoff.powi(failed_attempt as i32).max(0.0))
    }
}

/// Run `op` until it succeeds or the policy is exhausted. Each failure
/// short of the last is logged at warn level with the upcoming delay; the
/// final failure propagates unchanged.
pub async fn call_with_retry<T, F, Fut>(policy: RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < policy.retries => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    retries = policy.retries,
                    delay_secs = delay.as_secs_f64(),
                    error = ?e,
                    "{what} failed; backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
