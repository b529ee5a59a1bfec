//! Health-line emission (C12, §4.12): one structured log line on startup
//! and every hour afterward, summarizing the coordination store's
//! lifetime counters and circuit-breaker state. Deliberately thin — the
//! Store has no metrics backend to push into, just `tracing`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use loom_core::constants::VERSION;
use loom_core::models::CoordinationStats;
use loom_coord::CoordinationStore;

const HEALTH_LOG_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone, Serialize)]
pub struct HealthLine {
    pub version: &'static str,
    pub tracked_sessions: usize,
    pub stats: CoordinationStats,
    pub circuit_breaker_open: bool,
}

impl HealthLine {
    pub fn from_store(coord: &CoordinationStore) -> Self {
        let snapshot = coord.snapshot();
        let circuit_breaker_open = snapshot
            .circuit_breaker
            .backoff_until
            .map(|until| until > Utc::now())
            .unwrap_or(false);
        HealthLine {
            version: VERSION,
            tracked_sessions: snapshot.session_injection_counts.len(),
            stats: snapshot.stats,
            circuit_breaker_open,
        }
    }
}

/// Logs one health line at `info` level (§4.12: "on start + hourly").
pub fn log_health_line(coord: &CoordinationStore) {
    let line = HealthLine::from_store(coord);
    tracing::info!(
        version = line.version,
        tracked_sessions = line.tracked_sessions,
        lifetime_injections = line.stats.lifetime_injections,
        lifetime_searches = line.stats.lifetime_searches,
        search_hits = line.stats.search_hits,
        fallbacks = line.stats.fallbacks,
        circuit_breaker_open = line.circuit_breaker_open,
        "loom health"
    );
}

/// Runs until the process exits: logs a health line immediately, then
/// once every hour. Intended to be `tokio::spawn`ed once at startup by
/// the binary composing the runtime (`loom-cli`, `loom-server`).
pub async fn run_health_loop(coord: Arc<CoordinationStore>) {
    log_health_line(&coord);
    let mut interval = tokio::time::interval(Duration::from_secs(HEALTH_LOG_INTERVAL_SECS));
    interval.tick().await; // first tick fires immediately; consume it since we already logged above
    loop {
        interval.tick().await;
        log_health_line(&coord);
    }
}
