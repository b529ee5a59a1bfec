//! C7/chat-stream: appends serialize per entry, bump `message_count`
//! monotonically, and persist the (possibly generated) `message_id` onto
//! the stored line (§4.7, §8 scenario 4).

#[path = "support.rs"]
mod support;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use support::Harness;

fn message(content: &str) -> serde_json::Value {
    serde_json::json!({
        "role": "user",
        "content": content,
        "timestamp": Utc::now().to_rfc3339(),
        "message_id": null,
        "source": null,
    })
}

#[tokio::test]
async fn repeated_appends_increment_message_count_and_persist_message_id() {
    let harness = Harness::new();

    let (status, first): (StatusCode, serde_json::Value) = {
        let (status, body) = harness
            .send(
                Method::POST,
                "/api/v1/chat-stream/append",
                "chat-assistant",
                serde_json::json!({"session_id": "session-1", "message": message("hello")}),
            )
            .await;
        (status, body)
    };
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["ok"], true);
    assert_eq!(first["message_count"], 1);
    let stream_id = first["stream_id"].as_str().unwrap().to_string();

    let (status, second) = harness
        .send(
            Method::POST,
            "/api/v1/chat-stream/append",
            "chat-assistant",
            serde_json::json!({"session_id": "session-1", "message": message("world")}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message_count"], 2);
    assert_eq!(second["stream_id"], stream_id, "same external session key must resolve to the same stream");

    // Both appended lines must carry a non-null message_id once persisted,
    // even though the client sent `message_id: null` on both calls.
    let entry = harness.jsonl_content(&stream_id);
    let lines: Vec<&str> = entry.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["message_id"].is_string(), "persisted line must not keep message_id: null — {line}");
    }
}

#[tokio::test]
async fn reaction_targets_a_message_appended_in_the_same_session() {
    let harness = Harness::new();

    let (status, appended) = harness
        .send(
            Method::POST,
            "/api/v1/chat-stream/append",
            "chat-assistant",
            serde_json::json!({"session_id": "session-2", "message": message("reactable")}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let stream_id = appended["stream_id"].as_str().unwrap().to_string();

    let entry = harness.jsonl_content(&stream_id);
    let line: serde_json::Value = serde_json::from_str(entry.lines().last().unwrap()).unwrap();
    let message_id = line["message_id"].as_str().unwrap().to_string();

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/chat-stream/reaction",
            "chat-assistant",
            serde_json::json!({"target_message_id": message_id, "emoji": "+1", "from_user": "alice"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn reaction_against_unknown_message_is_not_found() {
    let harness = Harness::new();
    let (status, _body) = harness
        .send(
            Method::POST,
            "/api/v1/chat-stream/reaction",
            "chat-assistant",
            serde_json::json!({"target_message_id": "does-not-exist", "emoji": "+1", "from_user": "alice"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
