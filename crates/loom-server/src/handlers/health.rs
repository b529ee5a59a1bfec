//! `GET /health` (C12, §4.12): a thin HTTP window onto the coordination
//! store's lifetime stats, mirroring the health line
//! `loom-observability` logs on a startup + hourly cadence.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use loom_core::constants::VERSION;
use loom_core::models::CoordinationStats;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stats: CoordinationStats,
    pub circuit_breaker_open: bool,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.coord.snapshot();
    let circuit_breaker_open = snapshot
        .circuit_breaker
        .backoff_until
        .map(|until| until > chrono::Utc::now())
        .unwrap_or(false);
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
        stats: snapshot.stats,
        circuit_breaker_open,
    })
}
