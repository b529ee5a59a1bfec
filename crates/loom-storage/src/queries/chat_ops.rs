//! Chat-stream counters maintained alongside a `chat_log` entry's jsonl
//! representation (§3, §4.7).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use loom_core::errors::LoomResult;
use loom_core::models::MessageRole;

use crate::to_storage_err;

#[derive(Debug, Clone)]
pub struct ChatStreamCounters {
    pub entry_id: String,
    pub message_count: u64,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_role: Option<MessageRole>,
    pub last_message_id: Option<String>,
    pub last_extraction_enqueued_at: Option<DateTime<Utc>>,
}

fn row_to_counters(row: &rusqlite::Row) -> rusqlite::Result<ChatStreamCounters> {
    let last_role: Option<String> = row.get("last_role")?;
    Ok(ChatStreamCounters {
        entry_id: row.get("entry_id")?,
        message_count: row.get::<_, i64>("message_count")? as u64,
        last_message_at: row.get("last_message_at")?,
        last_role: last_role.as_deref().map(parse_role),
        last_message_id: row.get("last_message_id")?,
        last_extraction_enqueued_at: row.get("last_extraction_enqueued_at")?,
    })
}

fn parse_role(s: &str) -> MessageRole {
    match s {
        "assistant" => MessageRole::Assistant,
        "system" => MessageRole::System,
        "tool" => MessageRole::Tool,
        _ => MessageRole::User,
    }
}

fn role_str(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::System => "system",
        MessageRole::Tool => "tool",
    }
}

pub fn get_counters(conn: &Connection, entry_id: &str) -> LoomResult<Option<ChatStreamCounters>> {
    conn.query_row(
        "SELECT * FROM chat_streams WHERE entry_id = ?1",
        params![entry_id],
        row_to_counters,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn ensure_counters(conn: &Connection, entry_id: &str) -> LoomResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO chat_streams (entry_id, message_count, last_message_at, last_role, last_message_id, last_extraction_enqueued_at)
         VALUES (?1, 0, NULL, NULL, NULL, NULL)",
        params![entry_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Atomically bump `message_count`, `last_message_at`, `last_role` (§4.7).
pub fn record_message(
    conn: &Connection,
    entry_id: &str,
    role: MessageRole,
    at: DateTime<Utc>,
    message_id: &str,
) -> LoomResult<u64> {
    ensure_counters(conn, entry_id)?;
    conn.execute(
        "UPDATE chat_streams SET message_count = message_count + 1, last_message_at = ?2, last_role = ?3, last_message_id = ?4
         WHERE entry_id = ?1",
        params![entry_id, at.to_rfc3339(), role_str(role), message_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    let counters = get_counters(conn, entry_id)?.expect("just inserted/updated");
    Ok(counters.message_count)
}

/// Whether `message_count` just crossed a multiple of `interval` AND no
/// extraction was enqueued within the debounce window (§4.7).
pub fn should_enqueue_extraction(
    counters: &ChatStreamCounters,
    interval: u64,
    debounce_secs: i64,
    now: DateTime<Utc>,
) -> bool {
    let crossed = counters.message_count > 0 && counters.message_count % interval == 0;
    let debounced = counters
        .last_extraction_enqueued_at
        .map(|t| (now - t).num_seconds() < debounce_secs)
        .unwrap_or(false);
    crossed && !debounced
}

pub fn mark_extraction_enqueued(conn: &Connection, entry_id: &str, at: DateTime<Utc>) -> LoomResult<()> {
    conn.execute(
        "UPDATE chat_streams SET last_extraction_enqueued_at = ?2 WHERE entry_id = ?1",
        params![entry_id, at.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
