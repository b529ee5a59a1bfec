//! `POST /memories/check-derivation` (§4.8, §6).

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use loom_core::models::{DerivationCheck, DerivationRequest};

use crate::derivation;
use crate::error::ApiResult;
use crate::state::AppState;

/// Pre-flight probe: computes `{duplicate, depth}` without writing, so a
/// caller can decide whether to even attempt extraction for a candidate.
pub async fn check_derivation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DerivationRequest>,
) -> ApiResult<Json<DerivationCheck>> {
    let check = derivation::evaluate(
        &state.storage,
        &body.owner_id,
        &body.content,
        &body.source_agent,
        body.derived_from_memory_id.as_deref(),
    )?;
    Ok(Json(check))
}
