//! Translates `LoomError` into the `{ok:false, error:{code, message}}`
//! envelope (§7) with the matching HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use loom_core::errors::LoomError;

pub struct ApiError(pub LoomError);

impl From<LoomError> for ApiError {
    fn from(err: LoomError) -> Self {
        ApiError(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    ok: bool,
    error: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = status_and_code(&self.0);
        tracing::warn!(error = %self.0, code, "request failed");
        let body = ErrorEnvelope {
            ok: false,
            error: ErrorBody { code, message: self.0.to_string() },
        };
        (status, Json(body)).into_response()
    }
}

fn status_and_code(err: &LoomError) -> (StatusCode, &'static str) {
    match err {
        LoomError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        LoomError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
        LoomError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
        LoomError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
        LoomError::ImmutableEntryType { .. } => (StatusCode::CONFLICT, "immutable_entry_type"),
        LoomError::TrustedMemoryImmutable { .. } => (StatusCode::CONFLICT, "trusted_memory_immutable"),
        LoomError::DuplicateRelationship { .. } => (StatusCode::CONFLICT, "duplicate_relationship"),
        LoomError::Derivation(_) => (StatusCode::CONFLICT, "derivation_rejected"),
        LoomError::Chain(_) => (StatusCode::CONFLICT, "chain_broken"),
        LoomError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
        LoomError::Network(_) => (StatusCode::BAD_GATEWAY, "network_error"),
        LoomError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        LoomError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        LoomError::Coordination(_) => (StatusCode::INTERNAL_SERVER_ERROR, "coordination_error"),
        LoomError::Serialization(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
