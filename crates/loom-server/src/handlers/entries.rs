//! `POST /entries`, `PUT /entries/:id`, `DELETE /entries/:id` (§6).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use loom_core::errors::LoomError;
use loom_core::models::{Entry, EntryType, RepresentationForm};

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub title: String,
    pub entry_type: EntryType,
    pub source_type: Option<String>,
    pub public: Option<bool>,
    pub metadata: Option<HashMap<String, Value>>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub ok: bool,
    pub entry: Entry,
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Identity(provenance): Identity,
    Json(body): Json<CreateEntryRequest>,
) -> ApiResult<Json<EntryResponse>> {
    let owner_id = provenance.instance_id.clone();
    let mut entry = Entry::new(owner_id, body.entry_type, body.title);
    entry.provenance = Some(provenance);
    if let Some(metadata) = body.metadata {
        entry.metadata = metadata;
    }
    if let Some(source_type) = body.source_type {
        entry.metadata.insert("source_type".to_string(), Value::String(source_type));
    }
    if let Some(public) = body.public {
        entry.metadata.insert("public".to_string(), Value::Bool(public));
    }

    state.storage.create_entry(&entry)?;
    if let Some(content) = &body.content {
        state.storage.create_representation(&entry.id, RepresentationForm::Markdown, content)?;
    }

    Ok(Json(EntryResponse { ok: true, entry }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub metadata: Option<HashMap<String, Value>>,
}

pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Identity(_provenance): Identity,
    Path(id): Path<String>,
    Json(body): Json<UpdateEntryRequest>,
) -> ApiResult<Json<EntryResponse>> {
    let existing = state
        .storage
        .get_entry(&id)?
        .ok_or_else(|| LoomError::NotFound { id: id.clone() })?;
    if state.server_config.owner_is_trusted(&existing.owner_id) {
        return Err(LoomError::TrustedMemoryImmutable { id }.into());
    }

    let entry = state.storage.update_entry(&id, body.title, body.metadata)?;
    Ok(Json(EntryResponse { ok: true, entry }))
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Identity(_provenance): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<OkResponse>> {
    let existing = state
        .storage
        .get_entry(&id)?
        .ok_or_else(|| LoomError::NotFound { id: id.clone() })?;
    if state.server_config.owner_is_trusted(&existing.owner_id) {
        return Err(LoomError::TrustedMemoryImmutable { id }.into());
    }

    state.storage.delete_entry(&id)?;
    Ok(Json(OkResponse { ok: true }))
}
