//! Chat-Stream Syncer (C6): watches the host's sessions directory and
//! forwards new lines in the main session file to the Store, classifying
//! each as a reaction, noise, or a plain append (§4.6).

mod channel;
mod cursor;
mod noise;
mod reaction;
mod watcher;

pub use watcher::run as watch;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use loom_core::config::SyncConfig;
use loom_core::models::chat::{MessageContent, SessionRecord};
use loom_core::models::{AppendRequest, ChatMessage};
use loom_core::session_pointer::{resolve_main_session, MainSession};

use channel::ChannelMetadata;
pub use cursor::{CursorTable, FileCursor};

/// Caches the resolved main session for `session_pointer_cache_ttl_secs`
/// (§4.6), so every filesystem event doesn't re-read the pointer file.
pub struct PointerCache {
    pointer_path: PathBuf,
    sessions_dir: PathBuf,
    agent_kind: String,
    ttl: Duration,
    cached: Option<(MainSession, Instant)>,
}

impl PointerCache {
    pub fn new(pointer_path: PathBuf, sessions_dir: PathBuf, agent_kind: String, ttl_secs: u64) -> Self {
        Self { pointer_path, sessions_dir, agent_kind, ttl: Duration::from_secs(ttl_secs), cached: None }
    }

    pub fn resolve(&mut self) -> Option<MainSession> {
        if let Some((session, fetched_at)) = &self.cached {
            if fetched_at.elapsed() < self.ttl {
                return Some(session.clone());
            }
        }
        let resolved = resolve_main_session(&self.pointer_path, &self.sessions_dir, &self.agent_kind)?;
        self.cached = Some((resolved.clone(), Instant::now()));
        Some(resolved)
    }
}

pub struct Syncer {
    pub client: loom_client::LoomClient,
    pub cursors: CursorTable,
    pub pointer: PointerCache,
}

impl Syncer {
    pub fn new(
        client: loom_client::LoomClient,
        pointer_path: PathBuf,
        sessions_dir: PathBuf,
        agent_kind: String,
        config: &SyncConfig,
    ) -> Self {
        Self {
            client,
            cursors: CursorTable::new(config.max_tracked_files),
            pointer: PointerCache::new(pointer_path, sessions_dir, agent_kind, config.session_pointer_cache_ttl_secs),
        }
    }

    /// Processes whatever advanced in the main session file since the last
    /// call. A no-op if the pointer is unresolved or the file hasn't grown.
    pub async fn sync_once(&mut self, from_user: &str) {
        let Some(session) = self.pointer.resolve() else { return };
        self.sync_file(&session.session_file, &session.session_id, from_user).await;
    }

    async fn sync_file(&mut self, path: &Path, session_id: &str, from_user: &str) {
        let Ok(content) = fs::read_to_string(path) else { return };
        let lines: Vec<&str> = content.lines().collect();
        let cursor = self.cursors.get(path);

        if lines.len() <= cursor.lines_processed {
            return;
        }

        let mut last_timestamp = cursor.last_timestamp;
        for line in &lines[cursor.lines_processed..] {
            if line.trim().is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<SessionRecord>(line) else { continue };
            if record.kind != "message" || record.role.is_none() {
                continue;
            }
            last_timestamp = record.timestamp.or(last_timestamp);
            self.process_record(&record, session_id, from_user).await;
        }

        self.cursors.advance(path, lines.len(), last_timestamp);
    }

    async fn process_record(&self, record: &SessionRecord, session_id: &str, from_user: &str) {
        let text = record.content.as_ref().map(MessageContent::as_text).unwrap_or_default();

        if let Some(reaction) = reaction::parse_reaction(&text, from_user) {
            if let Err(e) = self.client.post_reaction(&reaction).await {
                tracing::warn!(error = %e, "reaction post failed");
            }
            return;
        }

        if noise::is_noise(&text) {
            return;
        }

        let role = record.role.expect("filtered above");
        let timestamp = record.timestamp.unwrap_or_else(chrono::Utc::now);
        let source = ChannelMetadata::extract(record).map(|m| m.to_source_string());
        let message = ChatMessage { role, content: text, timestamp, message_id: record.id.clone(), source };

        let request = AppendRequest { session_id: session_id.to_string(), message };
        if let Err(e) = self.client.append_message(&request).await {
            tracing::warn!(error = %e, "chat-stream append failed");
        }
    }
}
