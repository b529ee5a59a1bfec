//! C9/entries: a trusted-memory owner's entries can't be altered outside
//! the chain append path (§4.9).

#[path = "support.rs"]
mod support;

use axum::http::{Method, StatusCode};
use support::Harness;

async fn create_entry(harness: &Harness, owner: &str) -> String {
    let (status, body) = harness
        .send_as(
            Method::POST,
            "/api/v1/entries",
            "code-assistant",
            owner,
            serde_json::json!({"title": "a note", "entry_type": "note"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    body["entry"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn trusted_owner_entry_rejects_update_and_delete() {
    let harness = Harness::with_trusted_owner("trusted-owner");
    let entry_id = create_entry(&harness, "trusted-owner").await;

    let (status, body) = harness
        .send_as(
            Method::PUT,
            &format!("/api/v1/entries/{entry_id}"),
            "code-assistant",
            "trusted-owner",
            serde_json::json!({"title": "edited", "metadata": null}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "trusted_memory_immutable");

    let (status, _body) = harness
        .send_as(
            Method::DELETE,
            &format!("/api/v1/entries/{entry_id}"),
            "code-assistant",
            "trusted-owner",
            serde_json::Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn non_trusted_owner_entry_update_and_delete_succeed() {
    let harness = Harness::with_trusted_owner("trusted-owner");
    let entry_id = create_entry(&harness, "ordinary-owner").await;

    let (status, body) = harness
        .send_as(
            Method::PUT,
            &format!("/api/v1/entries/{entry_id}"),
            "code-assistant",
            "ordinary-owner",
            serde_json::json!({"title": "edited", "metadata": null}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["title"], "edited");

    let (status, body) = harness
        .send_as(
            Method::DELETE,
            &format!("/api/v1/entries/{entry_id}"),
            "code-assistant",
            "ordinary-owner",
            serde_json::Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}
