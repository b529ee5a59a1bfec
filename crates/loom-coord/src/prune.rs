//! Retention pruning for coordination records: age (7 days) and count (100
//! sessions) per §3's lifecycle note.

use std::path::Path;

use chrono::Utc;

use loom_core::config::CoordinationConfig;

use crate::lock::FileLock;
use crate::state_file;

/// Drop session-injection records older than `retention_days`, then, if
/// still over `max_sessions`, drop the oldest by `last_updated` until at
/// the cap. Best-effort: lock failure is a silent no-op (§4.1).
pub fn prune_sessions(state_path: &Path, lock_path: &Path, config: &CoordinationConfig) {
    let Ok(lock) = FileLock::acquire(lock_path, config) else { return };
    let mut state = state_file::read(state_path);
    let now = Utc::now();
    let cutoff = now - chrono::Duration::days(config.retention_days);

    state.session_injection_counts.retain(|_, record| {
        record.last_updated.map(|t| t >= cutoff).unwrap_or(true)
    });

    if state.session_injection_counts.len() > config.max_sessions {
        let mut entries: Vec<_> = state.session_injection_counts.drain().collect();
        entries.sort_by_key(|(_, record)| record.last_updated);
        let keep_from = entries.len().saturating_sub(config.max_sessions);
        state.session_injection_counts = entries.into_iter().skip(keep_from).collect();
    }

    let _ = state_file::write(state_path, &state);
    drop(lock);
}
