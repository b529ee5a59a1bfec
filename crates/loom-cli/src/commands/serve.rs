//! `loom serve`: boots the Store service (C7-C11) over `loom-storage` and
//! `loom-coord`, the Store-side half of the runtime (§6).

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use loom_core::config::LoomConfig;
use loom_coord::CoordinationStore;
use loom_server::ServerConfig;
use loom_storage::StorageEngine;

pub async fn run(
    loom_home: PathBuf,
    config: LoomConfig,
    bind: String,
    db_path: Option<PathBuf>,
    bearer_token: String,
    read_pool_size: usize,
    trusted_owners: Vec<String>,
    sessions_root: Option<PathBuf>,
) -> anyhow::Result<()> {
    let storage = Arc::new(match &db_path {
        Some(path) => StorageEngine::open(path, read_pool_size)?,
        None => StorageEngine::open_in_memory(read_pool_size)?,
    });
    let coord = Arc::new(CoordinationStore::new(&loom_home.join(".loom"), config.coordination.clone()));

    tokio::spawn(loom_observability::run_health_loop(coord.clone()));

    let server_config = ServerConfig {
        bind,
        bearer_token,
        db_path,
        read_pool_size,
        trusted_memory_owners: trusted_owners.into_iter().collect::<HashSet<_>>(),
        openclaw_sessions_root: sessions_root,
    };

    loom_server::serve(storage, coord, config, server_config, None, None).await
}
