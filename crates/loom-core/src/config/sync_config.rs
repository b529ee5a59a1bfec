//! Configuration for the chat-stream syncer (C6) and session importer (C10).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Cache TTL for resolving the "current main session" pointer file.
    pub session_pointer_cache_ttl_secs: u64,
    /// Per-file sync state is capped at this many tracked files.
    pub max_tracked_files: usize,
    /// `message_count` must cross a multiple of this before extraction queues.
    pub extraction_trigger_interval: u64,
    /// Debounce window for extraction-job enqueue per entry.
    pub extraction_debounce_secs: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            session_pointer_cache_ttl_secs: SESSION_POINTER_CACHE_TTL_SECS,
            max_tracked_files: SYNC_STATE_MAX_ENTRIES,
            extraction_trigger_interval: EXTRACTION_TRIGGER_INTERVAL,
            extraction_debounce_secs: EXTRACTION_DEBOUNCE_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Concurrency of the import queue. Kept at 1 to preserve chain order.
    pub queue_concurrency: usize,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self { queue_concurrency: 1 }
    }
}
