//! `POST /search`, `GET /search` — the search facade (C11, §4.11, §6).
//!
//! `loom-storage`'s schema carries a `memories_fts` keyword index but no
//! vector index (the embedding model is an out-of-scope external
//! collaborator, §1/§9), so `semantic`/`hybrid`/`memory_hybrid` all
//! degrade to the same FTS5 keyword path as `keyword` today; the
//! `semantic_weight`/`keyword_weight` fields are accepted but have no
//! separate semantic score to combine with until a real
//! `EmbeddingProvider` is wired in and the storage schema grows a vector
//! column.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;

use loom_core::errors::LoomResult;
use loom_core::models::{Attribution, Memory, SearchHit, SearchRequest, SearchResponse, SearchType};
use loom_storage::StorageEngine;

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn search_post(
    State(state): State<Arc<AppState>>,
    Identity(provenance): Identity,
    Json(body): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let response = run_search(&state, &provenance.instance_id, &provenance.agent_kind, body)?;
    state.coord.record_search(!response.hits.is_empty());
    Ok(Json(response))
}

pub async fn search_get(
    State(state): State<Arc<AppState>>,
    Identity(provenance): Identity,
    Query(body): Query<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let response = run_search(&state, &provenance.instance_id, &provenance.agent_kind, body)?;
    state.coord.record_search(!response.hits.is_empty());
    Ok(Json(response))
}

/// Read-time filtering defaults to excluding the calling agent-kind from
/// results, to prevent self-retrieval feedback (§4.2); an explicit
/// `include_agents`/`exclude_agents` on the request overrides the default.
fn run_search(state: &AppState, owner_id: &str, calling_agent_kind: &str, mut request: SearchRequest) -> ApiResult<SearchResponse> {
    if request.include_agents.is_none() && request.exclude_agents.is_none() {
        request.exclude_agents = Some(vec![calling_agent_kind.to_string()]);
    }
    let limit = request.limit.max(1);

    let scored: Vec<(Memory, f64)> = match request.search_type {
        SearchType::Atomic => state
            .storage
            .list_current_memories(owner_id, limit)?
            .into_iter()
            .map(|m| (m, 1.0))
            .collect(),
        SearchType::Hybrid | SearchType::Semantic | SearchType::Keyword | SearchType::MemoryHybrid => {
            state.storage.fts_search(owner_id, &request.query, limit)?
        }
    };

    let threshold = request.threshold.unwrap_or(0.0);
    let mut hits = Vec::with_capacity(scored.len());
    for (memory, relevance) in scored {
        if relevance < threshold {
            continue;
        }
        if let Some(hit) = build_hit(&state.storage, &memory, relevance)? {
            if passes_agent_filters(&hit.attribution.agent_kind, &request) {
                hits.push(hit);
            }
        }
    }
    hits.truncate(limit);

    Ok(SearchResponse { hits, search_type: request.search_type })
}

fn passes_agent_filters(agent_kind: &str, request: &SearchRequest) -> bool {
    if let Some(include) = &request.include_agents {
        if !include.iter().any(|a| a == agent_kind) {
            return false;
        }
    }
    if let Some(exclude) = &request.exclude_agents {
        if exclude.iter().any(|a| a == agent_kind) {
            return false;
        }
    }
    true
}

fn build_hit(storage: &StorageEngine, memory: &Memory, relevance: f64) -> LoomResult<Option<SearchHit>> {
    let Some(entry) = storage.get_entry(&memory.source_entry_id)? else {
        return Ok(None);
    };
    let (agent_kind, agent_version) = match &entry.provenance {
        Some(p) => (p.agent_kind.clone(), p.agent_version.clone()),
        None => (memory.source_agent.clone(), String::new()),
    };
    Ok(Some(SearchHit {
        entry_id: entry.id,
        title: entry.title,
        relevance,
        attribution: Attribution {
            agent_kind,
            agent_version,
            created_at: memory.valid_from,
            derivation_depth: memory.derivation_depth,
        },
    }))
}
