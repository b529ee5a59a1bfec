//! The coordination store (C1): a single shared view of rate limits,
//! circuit-breaker state, and per-session injection budgets for sibling
//! agents on one host (§4.1).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use loom_core::config::CoordinationConfig;
use loom_core::models::coordination::{RateWindowState, SessionInjectionRecord};
use loom_core::models::CoordinationState;

use crate::lock::FileLock;
use crate::prune::prune_sessions;
use crate::state_file;

/// Outcome of [`CoordinationStore::can_write`].
#[derive(Debug, Clone, PartialEq)]
pub struct WriteDecision {
    pub allowed: bool,
    pub reason: Option<String>,
    pub retry_after_secs: Option<u64>,
}

/// Outcome of [`CoordinationStore::check_injection`].
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionDecision {
    pub allowed: bool,
    pub reason: Option<String>,
    pub current_count: u32,
}

pub struct CoordinationStore {
    state_path: PathBuf,
    lock_path: PathBuf,
    config: CoordinationConfig,
}

impl CoordinationStore {
    pub fn new(coordination_dir: &Path, config: CoordinationConfig) -> Self {
        Self {
            state_path: coordination_dir.join("state.json"),
            lock_path: coordination_dir.join("state.lock"),
            config,
        }
    }

    fn with_locked_state<T>(&self, f: impl FnOnce(&mut CoordinationState) -> T) -> Option<T> {
        let lock = match FileLock::acquire(&self.lock_path, &self.config) {
            Ok(lock) => lock,
            Err(e) => {
                tracing::warn!(error = %e, "coordination lock not acquired, skipping update");
                return None;
            }
        };
        let mut state = state_file::read(&self.state_path);
        let result = f(&mut state);
        if let Err(e) = state_file::write(&self.state_path, &state) {
            tracing::warn!(error = %e, "coordination state write failed");
        }
        drop(lock);
        Some(result)
    }

    /// Read-only snapshot, used by health reporting (C12). Falls back to
    /// defaults on any read failure, same as the locked path.
    pub fn snapshot(&self) -> CoordinationState {
        state_file::read(&self.state_path)
    }

    /// `canWrite(agentKey)` (§4.1): denies when the circuit breaker is open
    /// or the agent's sliding window is saturated.
    pub fn can_write(&self, agent_key: &str, now: DateTime<Utc>) -> WriteDecision {
        self.with_locked_state(|state| {
            if let Some(backoff_until) = state.circuit_breaker.backoff_until {
                if backoff_until > now {
                    return WriteDecision {
                        allowed: false,
                        reason: Some("circuit breaker open".to_string()),
                        retry_after_secs: Some((backoff_until - now).num_seconds().max(0) as u64),
                    };
                }
            }

            let window = state.agent_rate_windows.entry(agent_key.to_string()).or_default();
            roll_window_if_expired(window, now, self.config.rate_window_secs);
            if window.count >= self.config.rate_window_max_writes {
                let window_start = window.window_start.unwrap_or(now);
                let retry_after = (self.config.rate_window_secs as i64
                    - (now - window_start).num_seconds())
                .max(0) as u64;
                return WriteDecision {
                    allowed: false,
                    reason: Some("rate window saturated".to_string()),
                    retry_after_secs: Some(retry_after),
                };
            }

            WriteDecision { allowed: true, reason: None, retry_after_secs: None }
        })
        .unwrap_or(WriteDecision { allowed: true, reason: None, retry_after_secs: None })
    }

    /// `recordWrite(agentKey)` (§4.1): rolls the window if expired,
    /// increments it, and clears the consecutive-failure counter.
    pub fn record_write(&self, agent_key: &str, now: DateTime<Utc>) {
        self.with_locked_state(|state| {
            let window = state.agent_rate_windows.entry(agent_key.to_string()).or_default();
            roll_window_if_expired(window, now, self.config.rate_window_secs);
            window.count += 1;
            state.circuit_breaker.consecutive_failures = 0;
            state.circuit_breaker.backoff_until = None;
        });
    }

    /// `recordFailure()` (§4.1): opens the circuit breaker once failures
    /// reach the threshold, doubling the backoff per failure past it,
    /// capped at `circuit_breaker_max_backoff_secs`.
    pub fn record_failure(&self, now: DateTime<Utc>) {
        self.with_locked_state(|state| {
            state.circuit_breaker.consecutive_failures += 1;
            let failures = state.circuit_breaker.consecutive_failures;
            if failures >= self.config.circuit_breaker_threshold {
                let extra = failures - self.config.circuit_breaker_threshold;
                let backoff_secs = self
                    .config
                    .circuit_breaker_initial_backoff_secs
                    .saturating_mul(1u64 << extra.min(16))
                    .min(self.config.circuit_breaker_max_backoff_secs);
                state.circuit_breaker.backoff_until = Some(now + chrono::Duration::seconds(backoff_secs as i64));
            }
        });
    }

    /// `checkInjection(sessionId, sessionFilePath)` (§4.1, §9's resolved
    /// open question: injection counts reset on birth-instant advance by
    /// more than `recreation_grace_secs`, per `reset_on_recreate` policy).
    pub fn check_injection(
        &self,
        session_id: &str,
        session_file_birth: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> InjectionDecision {
        self.with_locked_state(|state| {
            let record = state
                .session_injection_counts
                .entry(session_id.to_string())
                .or_insert_with(SessionInjectionRecord::default);

            if let Some(last_birth) = record.last_file_birth_time {
                if session_file_birth < last_birth {
                    return InjectionDecision {
                        allowed: false,
                        reason: Some("session file birth moved backward".to_string()),
                        current_count: record.count,
                    };
                }
                let advanced_by = (session_file_birth - last_birth).num_seconds();
                if advanced_by > self.config.recreation_grace_secs {
                    record.count = 0;
                }
            }
            record.last_file_birth_time = Some(session_file_birth);

            if record.count >= self.config.max_injections_per_session {
                return InjectionDecision {
                    allowed: false,
                    reason: Some(format!(
                        "at injection limit ({}/{})",
                        record.count, self.config.max_injections_per_session
                    )),
                    current_count: record.count,
                };
            }

            if let Some(last_injection) = state.last_injection_time {
                let since = (now - last_injection).num_seconds();
                if since < self.config.min_injection_spacing_secs as i64 {
                    return InjectionDecision {
                        allowed: false,
                        reason: Some("global injection spacing not yet elapsed".to_string()),
                        current_count: record.count,
                    };
                }
            }

            InjectionDecision { allowed: true, reason: None, current_count: record.count }
        })
        .unwrap_or(InjectionDecision { allowed: true, reason: None, current_count: 0 })
    }

    /// `recordInjection(sessionId, sessionFilePath, source)` (§4.1).
    pub fn record_injection(&self, session_id: &str, source: InjectionSource, now: DateTime<Utc>) {
        self.with_locked_state(|state| {
            let record = state
                .session_injection_counts
                .entry(session_id.to_string())
                .or_insert_with(SessionInjectionRecord::default);
            record.count += 1;
            record.last_updated = Some(now);
            state.last_injection_time = Some(now);
            state.stats.lifetime_injections += 1;
            if source == InjectionSource::Fallback {
                state.stats.fallbacks += 1;
            }
        });
        prune_sessions(&self.state_path, &self.lock_path, &self.config);
    }

    pub fn record_search(&self, hit: bool) {
        self.with_locked_state(|state| {
            state.stats.lifetime_searches += 1;
            if hit {
                state.stats.search_hits += 1;
            }
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionSource {
    Retrieval,
    Fallback,
}

fn roll_window_if_expired(window: &mut RateWindowState, now: DateTime<Utc>, window_secs: u64) {
    match window.window_start {
        Some(start) if (now - start).num_seconds() < window_secs as i64 => {}
        _ => {
            window.window_start = Some(now);
            window.count = 0;
        }
    }
}
