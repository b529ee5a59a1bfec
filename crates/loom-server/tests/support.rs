//! Shared harness for driving `loom-server`'s actual axum router in-process
//! (no bound socket), the way the HTTP-level scenarios in spec.md §8 are
//! meant to be exercised — through the handlers, not the storage layer
//! underneath them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use loom_core::config::LoomConfig;
use loom_core::models::RepresentationForm;
use loom_coord::CoordinationStore;
use loom_server::state::{AppState, ServerConfig};
use loom_storage::StorageEngine;

pub const AGENT_A: &str = "code-assistant";
pub const AGENT_B: &str = "chat-assistant";

/// One in-memory Store plus its router, with a scratch coordination
/// directory that's cleaned up when the harness drops.
pub struct Harness {
    pub router: Router,
    pub storage: Arc<StorageEngine>,
    _coord_dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_server_config(ServerConfig::default())
    }

    pub fn with_trusted_owner(owner_id: &str) -> Self {
        let mut config = ServerConfig::default();
        config.trusted_memory_owners.insert(owner_id.to_string());
        Self::with_server_config(config)
    }

    pub fn with_sessions_root(root: std::path::PathBuf) -> Self {
        let mut config = ServerConfig::default();
        config.openclaw_sessions_root = Some(root);
        Self::with_server_config(config)
    }

    fn with_server_config(server_config: ServerConfig) -> Self {
        let storage = Arc::new(StorageEngine::open_in_memory(2).unwrap());
        let coord_dir = tempfile::tempdir().unwrap();
        let coord = Arc::new(CoordinationStore::new(coord_dir.path(), Default::default()));
        let state = Arc::new(AppState::new(storage.clone(), coord, LoomConfig::default(), server_config, None, None));
        let router = loom_server::router::build(state);
        Self { router, storage, _coord_dir: coord_dir }
    }

    /// Read an entry's jsonl representation directly off the storage
    /// layer (chat-stream appends grow this; there's no HTTP endpoint to
    /// read it back, since the syncer's consumer is the fallback
    /// recoverer/extractor, not an agent).
    pub fn jsonl_content(&self, entry_id: &str) -> String {
        self.storage
            .get_representation(entry_id, RepresentationForm::Jsonl)
            .unwrap()
            .map(|r| r.content)
            .unwrap_or_default()
    }

    pub async fn send(&self, method: Method, path: &str, agent_kind: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send_as(method, path, agent_kind, "owner-1", body).await
    }

    /// Same as [`Harness::send`] but with an explicit `x-agent-instance-id`,
    /// for scenarios where the owner scoping (not just the agent kind)
    /// matters — trusted-memory ownership, per-owner chain locks.
    pub async fn send_as(
        &self,
        method: Method,
        path: &str,
        agent_kind: &str,
        instance_id: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .header("x-agent-id", agent_kind)
            .header("x-agent-version", "1.0.0")
            .header("x-agent-instance-id", instance_id)
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, agent_kind: &str) -> (StatusCode, serde_json::Value) {
        self.send(Method::GET, path, agent_kind, serde_json::Value::Null).await
    }

    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, agent_kind: &str, body: serde_json::Value) -> (StatusCode, T) {
        let (status, value) = self.send(Method::POST, path, agent_kind, body).await;
        (status, serde_json::from_value(value).unwrap())
    }
}
