//! Identity headers (§6) and bearer-token authentication.

use std::sync::Arc;

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use loom_core::errors::LoomError;
use loom_core::models::Provenance;

use crate::error::ApiError;
use crate::state::AppState;

const HEADER_AGENT_ID: &str = "x-agent-id";
const HEADER_AGENT_VERSION: &str = "x-agent-version";
const HEADER_AGENT_INSTANCE_ID: &str = "x-agent-instance-id";
const HEADER_AGENT_SUBAGENT_ID: &str = "x-agent-subagent-id";

/// Extracts the four identity headers every call is required to carry
/// (§6). `instance_id` doubles as the owner-scoping key throughout this
/// crate: the wire contract never names an explicit `owner_id`/principal
/// field, and per-principal auth (OAuth/API-key issuance) is out of scope
/// (§1), so the already-mandatory instance header is the natural seam.
pub struct Identity(pub Provenance);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_str = |name: &str| -> Option<String> {
            parts.headers.get(name)?.to_str().ok().map(|s| s.to_string())
        };

        let agent_kind = header_str(HEADER_AGENT_ID).ok_or(ApiError(LoomError::Unauthorized))?;
        let agent_version = header_str(HEADER_AGENT_VERSION).ok_or(ApiError(LoomError::Unauthorized))?;
        let instance_id = header_str(HEADER_AGENT_INSTANCE_ID).ok_or(ApiError(LoomError::Unauthorized))?;
        let sub_agent = header_str(HEADER_AGENT_SUBAGENT_ID);

        let mut provenance = Provenance::new(agent_kind, agent_version, instance_id);
        if let Some(sub_agent) = sub_agent {
            provenance = provenance.with_sub_agent(sub_agent);
        }
        Ok(Identity(provenance))
    }
}

/// Bearer-token auth middleware (§6). Skipped entirely when the configured
/// token is empty, so a local dev server doesn't need one set up.
pub async fn require_bearer_token(
    State(state): State<Arc<AppState>>,
    request: axum::extract::Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if state.server_config.bearer_token.is_empty() {
        return Ok(next.run(request).await);
    }

    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match supplied {
        Some(token) if token == state.server_config.bearer_token => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
