//! Provenance Client (C2): the only path agents use to reach the Store.
//! Attaches identity headers on every request, retries transient
//! failures, and reports write outcomes to the Coordination Store so the
//! circuit breaker and rate window stay accurate host-wide (§4.2).

mod client;
mod retry;

pub use client::LoomClient;
pub use retry::{is_retryable, retry_with_backoff, RetryConfig};
