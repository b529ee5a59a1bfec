//! C7/relationships: two agents racing to claim the same task must not
//! both win (§3 Claimable Task, §8 scenario 2).

#[path = "support.rs"]
mod support;

use axum::http::{Method, StatusCode};
use support::Harness;

#[tokio::test]
async fn only_one_concurrent_claim_wins() {
    let harness = Harness::new();
    let task_id = "task-shared-1";

    let claim = |target: &'static str| {
        let harness = &harness;
        async move {
            harness
                .send(
                    Method::POST,
                    "/api/v1/relationships",
                    "code-assistant",
                    serde_json::json!({
                        "source_entry_id": task_id,
                        "target_entry_id": target,
                        "relationship_type": "claimed_by",
                    }),
                )
                .await
        }
    };

    let (first, second) = tokio::join!(claim("person-a"), claim("person-b"));

    let outcomes = [first, second];
    let won = outcomes.iter().filter(|(status, body)| *status == StatusCode::OK && body["claimed"] == true).count();
    let lost = outcomes
        .iter()
        .filter(|(_, body)| body["claimed"] == false && body["reason"] == "already_claimed")
        .count();

    assert_eq!(won, 1, "exactly one claimant should win: {outcomes:?}");
    assert_eq!(lost, 1, "the other claimant should see already_claimed: {outcomes:?}");
}

#[tokio::test]
async fn sequential_claim_then_reclaim_is_rejected() {
    let harness = Harness::new();

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/relationships",
            "code-assistant",
            serde_json::json!({
                "source_entry_id": "task-shared-2",
                "target_entry_id": "person-a",
                "relationship_type": "claimed_by",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["claimed"], true);

    let (status, body) = harness
        .send(
            Method::POST,
            "/api/v1/relationships",
            "chat-assistant",
            serde_json::json!({
                "source_entry_id": "task-shared-2",
                "target_entry_id": "person-b",
                "relationship_type": "claimed_by",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["claimed"], false);
    assert_eq!(body["reason"], "already_claimed");
}
