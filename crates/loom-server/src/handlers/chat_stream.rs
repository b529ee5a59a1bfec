//! `POST /chat-stream/append`, `POST /chat-stream/reaction` (§4.7, §6).

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use uuid::Uuid;

use loom_core::errors::LoomError;
use loom_core::models::{AppendRequest, AppendResponse, ChatReaction, Entry, EntryType};

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::extraction;
use crate::state::AppState;

pub async fn append(
    State(state): State<Arc<AppState>>,
    Identity(provenance): Identity,
    Json(body): Json<AppendRequest>,
) -> ApiResult<Json<AppendResponse>> {
    let owner_id = provenance.instance_id.clone();
    let AppendRequest { session_id, message } = body;

    let entry = find_or_create_chat_log(&state, &owner_id, &provenance, &session_id)?;
    let message_count = append_to_entry(&state, &entry, &owner_id, message).await?;

    Ok(Json(AppendResponse {
        ok: true,
        stream_id: entry.id,
        message_count,
    }))
}

/// Find-or-create a `chat_log` entry for an external session key (§4.7).
/// Shared by the append handler and the session importer (C10), which
/// derive their own external keys from `agentKind`/`sessionId` instead of
/// a client-supplied `session_id`.
pub(crate) fn find_or_create_chat_log(
    state: &AppState,
    owner_id: &str,
    provenance: &loom_core::models::Provenance,
    external_key: &str,
) -> ApiResult<Entry> {
    if let Some(entry) = state.storage.find_entry_by_external_key(owner_id, external_key)? {
        return Ok(entry);
    }
    let mut entry = Entry::new(owner_id.to_string(), EntryType::ChatLog, external_key.to_string());
    entry.provenance = Some(provenance.clone());
    entry
        .metadata
        .insert("external_session_key".to_string(), serde_json::Value::String(external_key.to_string()));
    state.storage.create_entry(&entry)?;
    Ok(entry)
}

/// Append one message to an entry's jsonl representation, serialized per
/// entry (§4.7, §5), bump its chat-stream counters, and enqueue extraction
/// when the debounced trigger interval is crossed. Returns the new
/// `message_count`.
pub(crate) async fn append_to_entry(
    state: &Arc<AppState>,
    entry: &Entry,
    owner_id: &str,
    mut message: loom_core::models::ChatMessage,
) -> ApiResult<u64> {
    let lock = state.entry_lock(&entry.id);
    let _guard = lock.lock().await;

    let message_id = message.message_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    message.message_id = Some(message_id.clone());
    let line = serde_json::to_string(&message).map_err(LoomError::from)?;
    state.storage.append_jsonl_line(&entry.id, &line)?;

    let interval = state.config.sync.extraction_trigger_interval;
    let debounce = state.config.sync.extraction_debounce_secs;
    let should_extract = state.storage.record_chat_message_and_check_extraction(
        &entry.id,
        message.role,
        message.timestamp,
        &message_id,
        interval,
        debounce,
    )?;

    state.message_index.insert(message_id, entry.id.clone());

    if should_extract {
        extraction::trigger(state.clone(), entry.id.clone(), owner_id.to_string());
    }

    let counters = state
        .storage
        .get_chat_counters(&entry.id)?
        .expect("record_chat_message_and_check_extraction just created or updated this row");

    Ok(counters.message_count)
}

#[derive(Debug, Serialize)]
pub struct ReactionResponse {
    pub ok: bool,
}

pub async fn reaction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatReaction>,
) -> ApiResult<Json<ReactionResponse>> {
    let entry_id = state
        .message_index
        .get(&body.target_message_id)
        .map(|e| e.clone())
        .ok_or_else(|| ApiError(LoomError::NotFound { id: body.target_message_id.clone() }))?;

    let lock = state.entry_lock(&entry_id);
    let _guard = lock.lock().await;

    let line = serde_json::json!({
        "kind": "reaction",
        "target_message_id": body.target_message_id,
        "emoji": body.emoji,
        "from_user": body.from_user,
        "timestamp": chrono::Utc::now(),
    });
    state.storage.append_jsonl_line(&entry_id, &line.to_string())?;

    Ok(Json(ReactionResponse { ok: true }))
}
