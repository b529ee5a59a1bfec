//! The Loom Store: an axum HTTP service exposing the Ingestion Endpoint
//! (C7), Derivation Guard (C8) probe, Memory Chain (C9), Session Importer
//! (C10), Search Facade (C11), and a thin Health/Stats (C12) window, all
//! composed over `loom-storage`'s `StorageEngine` and `loom-coord`'s
//! `CoordinationStore` (§4.7–§4.12, §6, §7).

mod auth;
mod derivation;
mod error;
mod extraction;
pub mod handlers;
pub mod router;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use loom_core::config::LoomConfig;
use loom_core::traits::{EmbeddingProvider, MemoryExtractor};
use loom_coord::CoordinationStore;
use loom_storage::StorageEngine;

pub use state::{AppState, ServerConfig};

/// Build the app state and bind+serve until the process is signaled to
/// stop. Mirrors the teacher's `start_http_server` shape: a listener is
/// bound first, then `axum::serve` runs to completion inside the returned
/// future.
pub async fn serve(
    storage: Arc<StorageEngine>,
    coord: Arc<CoordinationStore>,
    config: LoomConfig,
    server_config: ServerConfig,
    extractor: Option<Arc<dyn MemoryExtractor>>,
    embedding: Option<Arc<dyn EmbeddingProvider>>,
) -> anyhow::Result<()> {
    let bind: SocketAddr = server_config.bind.parse()?;
    let state = Arc::new(AppState::new(storage, coord, config, server_config, extractor, embedding));
    let app = router::build(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "loom-server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
