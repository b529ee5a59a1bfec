//! Configuration for the coordination store (C1) and injection governor (C3).
//!
//! # Examples
//!
//! ```
//! use loom_core::config::CoordinationConfig;
//!
//! let config = CoordinationConfig::default();
//! assert_eq!(config.rate_window_max_writes, 30);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Sliding-window length, in seconds, for the per-agent write limit.
    pub rate_window_secs: u64,
    /// Writes allowed per agent within one rate window.
    pub rate_window_max_writes: u32,
    /// Consecutive failures before the circuit breaker opens.
    pub circuit_breaker_threshold: u32,
    /// Initial circuit-breaker backoff, doubled per failure past the threshold.
    pub circuit_breaker_initial_backoff_secs: u64,
    /// Circuit-breaker backoff ceiling.
    pub circuit_breaker_max_backoff_secs: u64,
    /// Maximum injections allowed for the lifetime of one session.
    pub max_injections_per_session: u32,
    /// Minimum spacing between two injections globally on this host.
    pub min_injection_spacing_secs: u64,
    /// How much a session file's birth instant must advance to be treated
    /// as "recreated" rather than clock skew.
    pub recreation_grace_secs: i64,
    /// Lock poll interval while waiting to acquire the coordination lock.
    pub lock_poll_interval_ms: u64,
    /// Give up waiting for the lock after this long.
    pub lock_acquire_timeout_secs: u64,
    /// A lock file older than this is reclaimed as stale.
    pub lock_stale_age_secs: u64,
    /// Coordination records older than this are pruned.
    pub retention_days: i64,
    /// Coordination state tracks at most this many sessions.
    pub max_sessions: usize,
    /// Wall-clock budget for one governor decision.
    pub decision_budget_secs: u64,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            rate_window_secs: RATE_WINDOW_SECS,
            rate_window_max_writes: RATE_WINDOW_MAX_WRITES,
            circuit_breaker_threshold: CIRCUIT_BREAKER_FAILURE_THRESHOLD,
            circuit_breaker_initial_backoff_secs: 60,
            circuit_breaker_max_backoff_secs: CIRCUIT_BREAKER_MAX_BACKOFF_SECS,
            max_injections_per_session: MAX_INJECTIONS_PER_SESSION,
            min_injection_spacing_secs: MIN_INJECTION_SPACING_SECS,
            recreation_grace_secs: SESSION_RECREATION_GRACE_SECS,
            lock_poll_interval_ms: LOCK_POLL_INTERVAL_MS,
            lock_acquire_timeout_secs: LOCK_ACQUIRE_TIMEOUT_SECS,
            lock_stale_age_secs: LOCK_STALE_AGE_SECS,
            retention_days: COORDINATION_RETENTION_DAYS,
            max_sessions: COORDINATION_MAX_SESSIONS,
            decision_budget_secs: GOVERNOR_DECISION_BUDGET_SECS,
        }
    }
}
