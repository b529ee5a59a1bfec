//! C11/search: results default to excluding the calling agent's own kind
//! (§4.2, §4.11).

#[path = "support.rs"]
mod support;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use loom_core::models::{Memory, MemoryKind};
use support::Harness;

fn seed_memory(harness: &Harness, owner: &str, source_entry_id: &str, source_agent: &str, content: &str) {
    let now = Utc::now();
    let memory = Memory {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: owner.to_string(),
        source_entry_id: source_entry_id.to_string(),
        chunk_index: 0,
        kind: MemoryKind::Fact,
        content: content.to_string(),
        confidence: 0.9,
        valid_from: now,
        valid_until: None,
        source_agent: source_agent.to_string(),
        derivation_depth: 0,
        derived_from: None,
        content_hash: Memory::compute_content_hash(owner, content),
    };
    harness.storage.insert_memory(&memory).unwrap();
}

async fn create_entry_with_provenance(harness: &Harness, owner: &str, agent_kind: &str, title: &str) -> String {
    let (status, body) = harness
        .send_as(
            axum::http::Method::POST,
            "/api/v1/entries",
            agent_kind,
            owner,
            serde_json::json!({"title": title, "entry_type": "note"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    body["entry"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn search_excludes_the_calling_agent_kind_by_default() {
    let harness = Harness::new();
    let owner = "owner-1";

    let own_entry = create_entry_with_provenance(&harness, owner, "code-assistant", "mine").await;
    seed_memory(&harness, owner, &own_entry, "code-assistant", "dark mode preference noted here");

    let other_entry = create_entry_with_provenance(&harness, owner, "chat-assistant", "theirs").await;
    seed_memory(&harness, owner, &other_entry, "chat-assistant", "dark mode preference from chat");

    let (status, body) = harness
        .send_as(
            Method::POST,
            "/api/v1/search",
            "code-assistant",
            owner,
            serde_json::json!({
                "query": "dark mode",
                "search_type": "keyword",
                "limit": 10,
                "semantic_weight": null,
                "keyword_weight": null,
                "include_agents": null,
                "exclude_agents": null,
                "threshold": null,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let hits = body["hits"].as_array().unwrap();
    assert!(!hits.is_empty(), "expected at least the chat-assistant hit");
    assert!(
        hits.iter().all(|h| h["attribution"]["agent_kind"] != "code-assistant"),
        "a calling agent must never see its own memories by default: {hits:?}"
    );
    assert!(hits.iter().any(|h| h["attribution"]["agent_kind"] == "chat-assistant"));
}

#[tokio::test]
async fn explicit_include_agents_overrides_the_default_self_exclusion() {
    let harness = Harness::new();
    let owner = "owner-1";
    let own_entry = create_entry_with_provenance(&harness, owner, "code-assistant", "mine").await;
    seed_memory(&harness, owner, &own_entry, "code-assistant", "a note about refactoring");

    let (status, body) = harness
        .send_as(
            Method::POST,
            "/api/v1/search",
            "code-assistant",
            owner,
            serde_json::json!({
                "query": "refactoring",
                "search_type": "keyword",
                "limit": 10,
                "semantic_weight": null,
                "keyword_weight": null,
                "include_agents": ["code-assistant"],
                "exclude_agents": null,
                "threshold": null,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let hits = body["hits"].as_array().unwrap();
    assert!(hits.iter().any(|h| h["attribution"]["agent_kind"] == "code-assistant"));
}
