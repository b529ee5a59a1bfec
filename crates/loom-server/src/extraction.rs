//! Memory extraction pipeline: triggered off a chat-stream append
//! crossing the extraction interval (§4.7), runs the configured
//! [`MemoryExtractor`](loom_core::traits::MemoryExtractor), and writes
//! whatever survives the derivation guard (C8), serialized per-owner
//! through the memory chain (C9) for trusted-memory owners.

use std::sync::Arc;

use chrono::Utc;

use loom_core::models::{Memory, MemoryCandidate};

use crate::derivation;
use crate::state::AppState;

/// Spawned as a background task; extraction failures are logged and
/// otherwise swallowed; a missed extraction pass is not fatal; the next
/// debounce window tries again (§4.7, §5).
pub fn trigger(state: Arc<AppState>, entry_id: String, owner_id: String) {
    tokio::spawn(async move {
        let Some(extractor) = state.extractor.clone() else {
            tracing::debug!(entry_id, "no memory extractor configured, skipping extraction");
            return;
        };

        let candidates = match extractor.extract(&entry_id).await {
            Ok(candidates) => candidates,
            Err(error) => {
                tracing::warn!(%error, entry_id, "memory extraction failed");
                return;
            }
        };

        for candidate in candidates {
            if let Err(error) = write_candidate(&state, &entry_id, &owner_id, candidate).await {
                tracing::warn!(%error, entry_id, owner_id, "candidate memory rejected or write failed");
            }
        }
    });
}

async fn write_candidate(
    state: &Arc<AppState>,
    entry_id: &str,
    owner_id: &str,
    candidate: MemoryCandidate,
) -> loom_core::errors::LoomResult<()> {
    let MemoryCandidate { kind, content, confidence, chunk_index, source_agent, derived_from } = candidate;

    let check = derivation::guard(&state.storage, owner_id, &content, &source_agent, derived_from.as_deref())?;

    let content_hash = Memory::compute_content_hash(owner_id, &content);
    let memory = Memory {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        source_entry_id: entry_id.to_string(),
        chunk_index,
        kind,
        content,
        confidence,
        valid_from: Utc::now(),
        valid_until: None,
        source_agent,
        derivation_depth: check.depth,
        derived_from,
        content_hash,
    };

    if state.server_config.owner_is_trusted(owner_id) {
        let lock = state.owner_lock(owner_id);
        let _guard = lock.lock().await;
        state.storage.insert_memory_and_record(&memory, entry_id)?;
    } else {
        state.storage.insert_memory(&memory)?;
    }

    Ok(())
}
