//! Exponential backoff with jitter on transient Store failures, up to three
//! attempts, before the failure is forwarded to the coordination store
//! (§4.2).

use std::future::Future;
use std::time::Duration;

use loom_core::errors::{LoomError, LoomResult};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryConfig {
    fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.initial_delay.as_millis() as f64;
        let exp = base_ms * self.backoff_multiplier.powi(attempt as i32);
        let capped = exp.min(self.max_delay.as_millis() as f64);
        let jitter_range = capped * self.jitter_factor;
        let jitter = rand::random::<f64>() * jitter_range;
        Duration::from_millis((capped + jitter - jitter_range / 2.0).max(0.0) as u64)
    }
}

/// Whether an error is transient (network/timeout/5xx) and worth retrying,
/// as opposed to authorization or derivation-limit failures (§7).
pub fn is_retryable(error: &LoomError) -> bool {
    matches!(error, LoomError::Network(_) | LoomError::Timeout(_))
}

/// Retry `operation` with exponential backoff + jitter, stopping early on a
/// non-retryable error (§4.2, §7).
pub async fn retry_with_backoff<F, Fut, T>(config: &RetryConfig, mut operation: F) -> LoomResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LoomResult<T>>,
{
    let mut last_error = None;
    for attempt in 0..config.max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !is_retryable(&e) {
                    return Err(e);
                }
                last_error = Some(e);
                if attempt + 1 < config.max_attempts {
                    tokio::time::sleep(config.delay_for(attempt)).await;
                }
            }
        }
    }
    Err(last_error.expect("loop runs at least once"))
}
