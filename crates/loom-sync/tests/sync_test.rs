use std::sync::Arc;

use loom_core::config::{CoordinationConfig, SyncConfig};
use loom_core::models::Provenance;
use loom_coord::CoordinationStore;
use loom_sync::Syncer;

fn make_client(dir: &std::path::Path) -> loom_client::LoomClient {
    let coord = Arc::new(CoordinationStore::new(dir, CoordinationConfig::default()));
    let provenance = Provenance::new("syncer", "0.0.0", "instance-a");
    loom_client::LoomClient::new("http://127.0.0.1:1", "token", provenance, coord)
}

#[tokio::test]
async fn unresolved_pointer_is_a_harmless_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let sessions_dir = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions_dir).unwrap();
    let pointer_path = dir.path().join("pointer.json");

    let client = make_client(dir.path());
    let mut syncer = Syncer::new(client, pointer_path, sessions_dir, "syncer".to_string(), &SyncConfig::default());

    syncer.sync_once("user-1").await;
}

#[tokio::test]
async fn unchanged_file_does_not_reprocess() {
    let dir = tempfile::tempdir().unwrap();
    let sessions_dir = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions_dir).unwrap();
    let session_path = sessions_dir.join("s1.jsonl");
    std::fs::write(&session_path, "").unwrap();

    let pointer_path = dir.path().join("pointer.json");
    std::fs::write(
        &pointer_path,
        r#"{"agent:syncer:main": {"sessionId": "s1", "sessionFile": "s1.jsonl"}}"#,
    )
    .unwrap();

    let client = make_client(dir.path());
    let mut syncer = Syncer::new(client, pointer_path, sessions_dir, "syncer".to_string(), &SyncConfig::default());

    syncer.sync_once("user-1").await;
    syncer.sync_once("user-1").await;
}
