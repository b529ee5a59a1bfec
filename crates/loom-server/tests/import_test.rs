//! C10/session importer: historic `.jsonl` sessions under
//! `{root}/agents/{agentKind}/sessions/{sessionId}.jsonl` are listed,
//! previewed, and imported idempotently (§4.10, §8 scenario 5).

#[path = "support.rs"]
mod support;

use axum::http::{Method, StatusCode};
use support::Harness;

fn write_session_file(root: &std::path::Path, agent_kind: &str, session_id: &str, lines: &[String]) {
    let dir = root.join("agents").join(agent_kind).join("sessions");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{session_id}.jsonl")), lines.join("\n")).unwrap();
}

fn message_line(role: &str, text: &str, timestamp: &str) -> String {
    serde_json::json!({
        "kind": "message",
        "role": role,
        "content": text,
        "timestamp": timestamp,
        "id": null,
    })
    .to_string()
}

#[tokio::test]
async fn preview_lists_session_files_sorted_by_earliest_instant() {
    let root = tempfile::tempdir().unwrap();
    write_session_file(
        root.path(),
        "openclaw",
        "session-late",
        &[message_line("user", "later message", "2026-01-02T00:00:00Z")],
    );
    write_session_file(
        root.path(),
        "openclaw",
        "session-early",
        &[message_line("user", "earlier message", "2026-01-01T00:00:00Z")],
    );

    let harness = Harness::with_sessions_root(root.path().to_path_buf());
    let (status, body) = harness.get("/api/v1/openclaw/import/preview", "code-assistant").await;
    assert_eq!(status, StatusCode::OK);

    let files = body.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["session_id"], "session-early");
    assert_eq!(files[1]["session_id"], "session-late");
}

#[tokio::test]
async fn import_all_is_idempotent_across_two_runs() {
    let root = tempfile::tempdir().unwrap();
    write_session_file(
        root.path(),
        "openclaw",
        "session-1",
        &[
            message_line("user", "hello from history", "2026-01-01T00:00:00Z"),
            message_line("assistant", "hi there", "2026-01-01T00:00:05Z"),
        ],
    );

    let harness = Harness::with_sessions_root(root.path().to_path_buf());

    let (status, body) = harness
        .send(Method::POST, "/api/v1/openclaw/import", "code-assistant", serde_json::Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["ok"], true);
    assert_eq!(files[0]["already_existed"], false);
    assert_eq!(files[0]["messages_imported"], 2);
    let entry_id = files[0]["entry_id"].as_str().unwrap().to_string();

    let (status, body) = harness
        .send(Method::POST, "/api/v1/openclaw/import", "code-assistant", serde_json::Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["already_existed"], true);
    assert_eq!(files[0]["entry_id"], entry_id);

    let jsonl = harness.jsonl_content(&entry_id);
    let line_count = jsonl.lines().filter(|l| !l.trim().is_empty()).count();
    assert_eq!(line_count, 2, "re-running import must not duplicate already-imported messages");
}

#[tokio::test]
async fn dry_run_import_does_not_write_any_entries() {
    let root = tempfile::tempdir().unwrap();
    write_session_file(
        root.path(),
        "openclaw",
        "session-1",
        &[message_line("user", "hello", "2026-01-01T00:00:00Z")],
    );

    let harness = Harness::with_sessions_root(root.path().to_path_buf());
    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/openclaw/import?dry_run=true",
            "code-assistant",
            serde_json::Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dry_run"], true);
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["entry_id"], serde_json::Value::Null);
}
