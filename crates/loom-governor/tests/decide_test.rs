use std::sync::Arc;

use loom_core::config::CoordinationConfig;
use loom_core::models::Provenance;
use loom_core::LoomConfig;
use loom_coord::CoordinationStore;
use loom_governor::Governor;

fn client(coord: Arc<CoordinationStore>) -> loom_client::LoomClient {
    let provenance = Provenance::new("test-agent", "0.0.0", "instance-a");
    loom_client::LoomClient::new("http://127.0.0.1:1", "token", provenance, coord)
}

#[tokio::test]
async fn missing_session_pointer_skips_injection() {
    let dir = tempfile::tempdir().unwrap();
    let coord = Arc::new(CoordinationStore::new(dir.path(), CoordinationConfig::default()));
    let config = LoomConfig::default();
    let pointer_path = dir.path().join("main-session-pointer.json");
    let sessions_dir = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions_dir).unwrap();

    let loom_client = client(coord.clone());
    let governor = Governor {
        coord: &coord,
        client: &loom_client,
        config: &config,
        pointer_path: &pointer_path,
        sessions_dir: &sessions_dir,
        agent_kind: "test-agent",
    };

    assert!(governor.decide().await.is_none());
}

#[tokio::test]
async fn denied_injection_budget_skips_without_network_call() {
    let dir = tempfile::tempdir().unwrap();
    let coord = Arc::new(CoordinationStore::new(dir.path(), CoordinationConfig::default()));
    let config = LoomConfig::default();
    let sessions_dir = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions_dir).unwrap();
    let session_path = sessions_dir.join("session-1.jsonl");
    std::fs::write(&session_path, "").unwrap();
    let pointer_path = dir.path().join("main-session-pointer.json");
    std::fs::write(
        &pointer_path,
        r#"{"agent:test-agent:main": {"sessionId": "session-1", "sessionFile": "session-1.jsonl"}}"#,
    )
    .unwrap();

    let now = chrono::Utc::now();
    for _ in 0..config.coordination.max_injections_per_session {
        coord.record_injection("session-1", loom_coord::InjectionSource::Retrieval, now);
    }

    let loom_client = client(coord.clone());
    let governor = Governor {
        coord: &coord,
        client: &loom_client,
        config: &config,
        pointer_path: &pointer_path,
        sessions_dir: &sessions_dir,
        agent_kind: "test-agent",
    };

    assert!(governor.decide().await.is_none());
}
