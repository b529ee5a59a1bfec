//! Route table: `/health` unauthenticated, everything else under
//! `/api/v1` behind the bearer-token middleware (§6, §7).

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::require_bearer_token;
use crate::handlers;
use crate::state::AppState;

pub fn build(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let api_routes = Router::new()
        .route("/entries", post(handlers::entries::create_entry))
        .route(
            "/entries/:id",
            put(handlers::entries::update_entry).delete(handlers::entries::delete_entry),
        )
        .route("/entries/:id/relationships", get(handlers::relationships::list_relationships))
        .route(
            "/entries/:id/relationships/blocking-chain",
            get(handlers::relationships::blocking_chain),
        )
        .route("/persons/:id/assigned-tasks", get(handlers::relationships::assigned_tasks))
        .route("/relationships", post(handlers::relationships::create_relationship))
        .route("/chat-stream/append", post(handlers::chat_stream::append))
        .route("/chat-stream/reaction", post(handlers::chat_stream::reaction))
        .route("/memories/check-derivation", post(handlers::memories::check_derivation))
        .route("/search", post(handlers::search::search_post).get(handlers::search::search_get))
        .route("/openclaw/import", post(handlers::importer::import_all))
        .route("/openclaw/import/file", post(handlers::importer::import_file))
        .route("/openclaw/import/preview", get(handlers::importer::import_preview))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .with_state(state)
}
