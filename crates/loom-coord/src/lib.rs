//! Coordination Store (C1): the file-backed shared state — lock, circuit
//! breaker, per-agent rate window, and per-session injection budgets —
//! that sibling agents on one host cooperate through (§3, §4.1).
//!
//! This is process-wide state shared across siblings by design (§9:
//! "Global state vs coordination"); callers should hold one
//! [`CoordinationStore`] per host root, not one per agent instance.

mod lock;
mod prune;
mod state_file;
mod store;

pub use lock::FileLock;
pub use store::{CoordinationStore, InjectionDecision, InjectionSource, WriteDecision};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use loom_core::config::CoordinationConfig;

    fn store(dir: &std::path::Path) -> CoordinationStore {
        CoordinationStore::new(dir, CoordinationConfig::default())
    }

    #[test]
    fn write_allowed_until_rate_window_saturates() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let now = Utc::now();
        for _ in 0..30 {
            assert!(store.can_write("agent-a", now).allowed);
            store.record_write("agent-a", now);
        }
        let decision = store.can_write("agent-a", now);
        assert!(!decision.allowed);
    }

    #[test]
    fn circuit_breaker_opens_after_threshold_failures() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let now = Utc::now();
        for _ in 0..5 {
            store.record_failure(now);
        }
        let decision = store.can_write("agent-a", now);
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("circuit breaker open"));
    }

    #[test]
    fn injection_budget_resets_only_on_session_recreation() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let birth = Utc::now();
        let mut now = birth;

        for i in 0..5 {
            let decision = store.check_injection("session-1", birth, now);
            assert!(decision.allowed, "injection {i} should be allowed");
            store.record_injection("session-1", InjectionSource::Retrieval, now);
            now += Duration::seconds(31);
        }

        let sixth = store.check_injection("session-1", birth, now);
        assert!(!sixth.allowed);

        let recreated_birth = birth + Duration::seconds(10);
        let after_restart = store.check_injection("session-1", recreated_birth, now);
        assert!(after_restart.allowed, "recreated session file should reset the budget");
    }

    #[test]
    fn injection_budget_not_reset_by_clock_noise() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let birth = Utc::now();
        let now = birth;
        for _ in 0..5 {
            store.check_injection("session-1", birth, now);
            store.record_injection("session-1", InjectionSource::Retrieval, now);
        }
        // Birth instant nudged by 1s, within the 2s grace window: no reset.
        let noisy_birth = birth + Duration::seconds(1);
        let decision = store.check_injection("session-1", noisy_birth, now);
        assert!(!decision.allowed);
    }
}
