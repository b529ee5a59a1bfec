//! Session-directory scan (§4.5): bounded by file count, bytes read, and a
//! 2x-target early stop, so a large sessions directory never turns a
//! fallback recovery into an unbounded read.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use loom_core::config::FallbackConfig;
use loom_core::models::chat::MessageRole;
use loom_core::models::SessionRecord;

use crate::blocklist::is_blocked;

pub struct RecoveredMessage {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

fn is_skipped_path(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.contains(".deleted") || name.contains(".locked") {
        return true;
    }
    path.components().any(|c| c.as_os_str() == "archived")
}

fn file_age(modified: SystemTime) -> chrono::Duration {
    let now = SystemTime::now();
    match now.duration_since(modified) {
        Ok(d) => chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero()),
        Err(_) => chrono::Duration::zero(),
    }
}

/// Candidate session files: not skipped, within the modification window,
/// and under the per-file size cap. Sorted newest-first so the most
/// recently active sessions are favored when `max_files` is hit.
fn candidate_files(sessions_dir: &Path, config: &FallbackConfig) -> Vec<(PathBuf, SystemTime)> {
    let window_hours = config.window_hours.min(config.window_ceiling_hours);
    let window = chrono::Duration::hours(window_hours as i64);

    let mut candidates: Vec<(PathBuf, SystemTime)> = walkdir::WalkDir::new(sessions_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| !is_skipped_path(e.path()))
        .filter_map(|e| {
            let metadata = e.metadata().ok()?;
            if metadata.len() > config.max_file_size_bytes {
                return None;
            }
            let modified = metadata.modified().ok()?;
            if file_age(modified) > window {
                return None;
            }
            Some((e.path().to_path_buf(), modified))
        })
        .collect();

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates.truncate(config.max_files);
    candidates
}

/// Scans at most `max_files` candidate files, extracting user/assistant
/// message text subject to the blocklist, byte, and line caps (§4.5).
pub fn scan_messages(sessions_dir: &Path, config: &FallbackConfig) -> Vec<RecoveredMessage> {
    let mut messages = Vec::new();
    let mut bytes_read: u64 = 0;
    let early_stop = config.target_message_count * 2;

    for (path, _) in candidate_files(sessions_dir, config) {
        if bytes_read >= config.max_total_bytes || messages.len() >= early_stop {
            break;
        }
        let Ok(content) = fs::read_to_string(&path) else { continue };
        bytes_read += content.len() as u64;

        for line in content.lines().take(config.max_lines_per_file) {
            if line.trim().is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<SessionRecord>(line) else { continue };
            if record.kind != "message" {
                continue;
            }
            let Some(role) = record.role else { continue };
            if !matches!(role, MessageRole::User | MessageRole::Assistant) {
                continue;
            }
            let Some(content) = &record.content else { continue };
            let text = content.as_text();
            if is_blocked(&text) {
                continue;
            }
            let text = truncate_chars(&text, config.max_message_chars);
            let timestamp = record.timestamp.unwrap_or_else(Utc::now);
            messages.push(RecoveredMessage { role, text, timestamp });

            if bytes_read >= config.max_total_bytes || messages.len() >= early_stop {
                break;
            }
        }
    }

    messages
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}
