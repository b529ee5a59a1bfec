//! `POST /relationships`, `GET /entries/:id/relationships`,
//! `GET /entries/:id/relationships/blocking-chain`,
//! `GET /persons/:id/assigned-tasks` (§4.3, §6).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use loom_core::errors::LoomError;
use loom_core::models::{ClaimResult, Relationship, RelationshipType};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRelationshipRequest {
    pub source_entry_id: String,
    pub target_entry_id: String,
    pub relationship_type: RelationshipType,
    pub metadata: Option<Value>,
}

/// `claimed_by` edges go through [`StorageEngine::claim_task`](loom_storage::StorageEngine::claim_task)
/// for exclusivity (§3 Claimable Task, §8 scenario 2) and respond with a
/// [`ClaimResult`]; every other relationship type inserts directly.
pub async fn create_relationship(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRelationshipRequest>,
) -> ApiResult<Json<Value>> {
    if matches!(body.relationship_type, RelationshipType::ClaimedBy) {
        let claimed = state.storage.claim_task(&body.source_entry_id, &body.target_entry_id)?;
        let result = if claimed { ClaimResult::won() } else { ClaimResult::already_claimed() };
        let value = serde_json::to_value(result).map_err(LoomError::from)?;
        return Ok(Json(value));
    }

    let relationship = Relationship {
        id: Uuid::new_v4().to_string(),
        source_entry_id: body.source_entry_id,
        target_entry_id: body.target_entry_id,
        relationship_type: body.relationship_type,
        metadata: body.metadata,
    };
    state.storage.insert_relationship(&relationship)?;
    Ok(Json(serde_json::json!({ "ok": true, "relationship": relationship })))
}

#[derive(Debug, Deserialize)]
pub struct RelationshipsQuery {
    #[serde(rename = "type")]
    pub rel_type: Option<String>,
    pub direction: Option<String>,
}

fn parse_relationship_type(s: &str) -> RelationshipType {
    match s {
        "claimed_by" => RelationshipType::ClaimedBy,
        "assigned_to" => RelationshipType::AssignedTo,
        "blocks" => RelationshipType::Blocks,
        "depends_on" => RelationshipType::DependsOn,
        "part_of" => RelationshipType::PartOf,
        other => RelationshipType::Other(other.to_string()),
    }
}

pub async fn list_relationships(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<String>,
    Query(query): Query<RelationshipsQuery>,
) -> ApiResult<Json<Vec<Relationship>>> {
    let rel_type = query.rel_type.as_deref().map(parse_relationship_type);
    let outgoing = query.direction.as_deref() != Some("incoming");
    let relationships = state.storage.list_relationships(&entry_id, rel_type.as_ref(), outgoing)?;
    Ok(Json(relationships))
}

pub async fn blocking_chain(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<String>,
) -> ApiResult<Json<Vec<Relationship>>> {
    Ok(Json(state.storage.blocking_chain(&entry_id)?))
}

#[derive(Debug, Deserialize)]
pub struct AssignedTasksQuery {
    #[serde(default)]
    pub include_children: bool,
}

pub async fn assigned_tasks(
    State(state): State<Arc<AppState>>,
    Path(person_id): Path<String>,
    Query(query): Query<AssignedTasksQuery>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.storage.assigned_tasks(&person_id, query.include_children)?))
}
