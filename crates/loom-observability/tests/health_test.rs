use chrono::Utc;

use loom_core::config::CoordinationConfig;
use loom_coord::{CoordinationStore, InjectionSource};
use loom_observability::HealthLine;

#[test]
fn health_line_reflects_store_counters() {
    let dir = tempfile::tempdir().unwrap();
    let store = CoordinationStore::new(dir.path(), CoordinationConfig::default());
    let now = Utc::now();

    store.check_injection("session-1", now, now);
    store.record_injection("session-1", InjectionSource::Retrieval, now);
    store.record_search(true);
    store.record_search(false);

    let line = HealthLine::from_store(&store);
    assert_eq!(line.tracked_sessions, 1);
    assert_eq!(line.stats.lifetime_injections, 1);
    assert_eq!(line.stats.lifetime_searches, 2);
    assert_eq!(line.stats.search_hits, 1);
    assert!(!line.circuit_breaker_open);
}

#[test]
fn health_line_reports_open_circuit_breaker() {
    let dir = tempfile::tempdir().unwrap();
    let store = CoordinationStore::new(dir.path(), CoordinationConfig::default());
    let now = Utc::now();

    for _ in 0..10 {
        store.record_failure(now);
    }

    let line = HealthLine::from_store(&store);
    assert!(line.circuit_breaker_open);
}
