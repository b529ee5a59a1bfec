//! Memory CRUD, content-hash duplicate lookup, and supersession (§3, §4.8).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use loom_core::errors::LoomResult;
use loom_core::models::{Memory, MemoryKind};

use crate::to_storage_err;

fn row_to_memory(row: &rusqlite::Row) -> rusqlite::Result<Memory> {
    let kind: String = row.get("kind")?;
    Ok(Memory {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        source_entry_id: row.get("source_entry_id")?,
        chunk_index: row.get::<_, i64>("chunk_index")? as u32,
        kind: parse_kind(&kind),
        content: row.get("content")?,
        confidence: row.get("confidence")?,
        valid_from: row.get("valid_from")?,
        valid_until: row.get("valid_until")?,
        source_agent: row.get("source_agent")?,
        derivation_depth: row.get::<_, i64>("derivation_depth")? as u32,
        derived_from: row.get("derived_from")?,
        content_hash: row.get("content_hash")?,
    })
}

fn parse_kind(s: &str) -> MemoryKind {
    match s {
        "preference" => MemoryKind::Preference,
        "event" => MemoryKind::Event,
        "observation" => MemoryKind::Observation,
        "decision" => MemoryKind::Decision,
        _ => MemoryKind::Fact,
    }
}

fn kind_str(kind: MemoryKind) -> &'static str {
    match kind {
        MemoryKind::Fact => "fact",
        MemoryKind::Preference => "preference",
        MemoryKind::Event => "event",
        MemoryKind::Observation => "observation",
        MemoryKind::Decision => "decision",
    }
}

/// The current (non-superseded) memory for `{owner, content_hash}`, if any
/// (§3 invariant ii; §4.8 duplicate check).
pub fn find_current_by_content_hash(
    conn: &Connection,
    owner_id: &str,
    content_hash: &str,
) -> LoomResult<Option<Memory>> {
    conn.query_row(
        "SELECT * FROM memories WHERE owner_id = ?1 AND content_hash = ?2 AND valid_until IS NULL",
        params![owner_id, content_hash],
        row_to_memory,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_memory(conn: &Connection, id: &str) -> LoomResult<Option<Memory>> {
    conn.query_row("SELECT * FROM memories WHERE id = ?1", params![id], row_to_memory)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn insert_memory(conn: &Connection, memory: &Memory) -> LoomResult<()> {
    conn.execute(
        "INSERT INTO memories (id, owner_id, source_entry_id, chunk_index, kind, content, confidence, valid_from, valid_until, source_agent, derivation_depth, derived_from, content_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            memory.id,
            memory.owner_id,
            memory.source_entry_id,
            memory.chunk_index,
            kind_str(memory.kind),
            memory.content,
            memory.confidence,
            memory.valid_from.to_rfc3339(),
            memory.valid_until.map(|t| t.to_rfc3339()),
            memory.source_agent,
            memory.derivation_depth,
            memory.derived_from,
            memory.content_hash,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Mark a memory superseded; `valid_until` must precede the successor's
/// `valid_from` (§3 invariant iii) — callers pass the successor's
/// `valid_from` as `at`.
pub fn supersede_memory(conn: &Connection, id: &str, at: DateTime<Utc>) -> LoomResult<()> {
    conn.execute(
        "UPDATE memories SET valid_until = ?2 WHERE id = ?1",
        params![id, at.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Full-text search over memory content via the `memories_fts` shadow table
/// (C11 keyword/hybrid search).
pub fn fts_search(conn: &Connection, owner_id: &str, query: &str, limit: usize) -> LoomResult<Vec<(Memory, f64)>> {
    let mut stmt = conn
        .prepare(
            "SELECT m.*, bm25(memories_fts) AS rank
             FROM memories_fts
             JOIN memories m ON m.rowid = memories_fts.rowid
             WHERE memories_fts MATCH ?2 AND m.owner_id = ?1 AND m.valid_until IS NULL
             ORDER BY rank LIMIT ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![owner_id, query, limit as i64], |row| {
            let memory = row_to_memory(row)?;
            let rank: f64 = row.get("rank")?;
            // bm25() is negative and lower-is-better; fold into a 0..1-ish score.
            let relevance = 1.0 / (1.0 + rank.abs());
            Ok((memory, relevance))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// All current memories for an owner, most recent first (C11 `atomic` mode).
pub fn list_current_for_owner(conn: &Connection, owner_id: &str, limit: usize) -> LoomResult<Vec<Memory>> {
    let mut stmt = conn
        .prepare(
            "SELECT * FROM memories WHERE owner_id = ?1 AND valid_until IS NULL ORDER BY valid_from DESC LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![owner_id, limit as i64], row_to_memory)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
