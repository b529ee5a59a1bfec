//! Shared server state: the `StorageEngine`/`CoordinationStore` handles
//! every handler closes over, plus the two external-collaborator seams
//! (§9) and the in-process indices a stateless wire contract can't carry.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use loom_core::config::LoomConfig;
use loom_core::traits::{EmbeddingProvider, MemoryExtractor};
use loom_coord::CoordinationStore;
use loom_storage::StorageEngine;

/// Store-side configuration: bind address, shared bearer token, and the
/// set of owners running in trusted-memory mode (§4.9). Kept separate
/// from [`LoomConfig`], which tunes the agent-side runtime instead.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub bearer_token: String,
    pub db_path: Option<std::path::PathBuf>,
    pub read_pool_size: usize,
    pub trusted_memory_owners: HashSet<String>,
    /// Root directory the session importer (C10) walks for
    /// `agents/{agentKind}/sessions/{sessionId}.jsonl` files.
    pub openclaw_sessions_root: Option<std::path::PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:4848".to_string(),
            bearer_token: String::new(),
            db_path: None,
            read_pool_size: 4,
            trusted_memory_owners: HashSet::new(),
            openclaw_sessions_root: None,
        }
    }
}

impl ServerConfig {
    pub fn owner_is_trusted(&self, owner_id: &str) -> bool {
        self.trusted_memory_owners.contains(owner_id)
    }
}

/// The state every axum handler closes over via `State<Arc<AppState>>`.
pub struct AppState {
    pub storage: Arc<StorageEngine>,
    pub coord: Arc<CoordinationStore>,
    pub config: LoomConfig,
    pub server_config: ServerConfig,
    pub extractor: Option<Arc<dyn MemoryExtractor>>,
    pub embedding: Option<Arc<dyn EmbeddingProvider>>,

    /// Serializes jsonl appends per entry (§4.7, §5) so two concurrent
    /// chat-stream appends to the same entry never interleave lines.
    pub entry_locks: DashMap<String, Arc<Mutex<()>>>,
    /// Serializes memory-chain writes per owner (§4.9) for trusted-memory
    /// owners, where the chain must never fork.
    pub owner_locks: DashMap<String, Arc<Mutex<()>>>,
    /// `message_id -> entry_id`, populated on every chat-stream append.
    /// `POST /chat-stream/reaction` carries no entry/session reference
    /// (§6), so this in-memory index is how a reaction finds the jsonl it
    /// belongs to. Lost on restart: a pragmatic gap, not a durability
    /// guarantee (see DESIGN.md).
    pub message_index: DashMap<String, String>,
}

impl AppState {
    pub fn new(
        storage: Arc<StorageEngine>,
        coord: Arc<CoordinationStore>,
        config: LoomConfig,
        server_config: ServerConfig,
        extractor: Option<Arc<dyn MemoryExtractor>>,
        embedding: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        Self {
            storage,
            coord,
            config,
            server_config,
            extractor,
            embedding,
            entry_locks: DashMap::new(),
            owner_locks: DashMap::new(),
            message_index: DashMap::new(),
        }
    }

    /// Fetch or create the per-entry append lock (§4.7).
    pub fn entry_lock(&self, entry_id: &str) -> Arc<Mutex<()>> {
        self.entry_locks
            .entry(entry_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Fetch or create the per-owner chain lock (§4.9).
    pub fn owner_lock(&self, owner_id: &str) -> Arc<Mutex<()>> {
        self.owner_locks
            .entry(owner_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
