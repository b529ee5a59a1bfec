//! The per-owner memory hash chain (§3, §4.9).

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use loom_core::errors::{LoomError, LoomResult};
use loom_core::models::chain::CHAIN_GENESIS_HASH;
use loom_core::models::{ChainRecord, ChainRecordKind, ChainVerification};

use crate::queries::memory_ops;
use crate::to_storage_err;

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ChainRecord> {
    let kind: String = row.get("kind")?;
    Ok(ChainRecord {
        owner_id: row.get("owner_id")?,
        sequence: row.get::<_, i64>("sequence")? as u64,
        previous_hash: row.get("previous_hash")?,
        this_hash: row.get("this_hash")?,
        entry_id: row.get("entry_id")?,
        memory_id: row.get("memory_id")?,
        kind: if kind == "supersede" { ChainRecordKind::Supersede } else { ChainRecordKind::Create },
        created_at: row.get("created_at")?,
    })
}

fn kind_str(kind: ChainRecordKind) -> &'static str {
    match kind {
        ChainRecordKind::Create => "create",
        ChainRecordKind::Supersede => "supersede",
    }
}

/// The tip of an owner's chain: `(sequence, this_hash)`, or the genesis
/// values if the owner has no records yet.
pub fn chain_tip(conn: &Connection, owner_id: &str) -> LoomResult<(u64, String)> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT sequence, this_hash FROM chain_records WHERE owner_id = ?1 ORDER BY sequence DESC LIMIT 1",
            params![owner_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(match row {
        Some((seq, hash)) => (seq as u64, hash),
        None => (0, CHAIN_GENESIS_HASH.to_string()),
    })
}

/// Append the next record for an owner, serialized by the caller's
/// per-owner worker discipline (§4.9, §5). `this_hash` is computed over the
/// chained memory's *current* content hash and validity window, read fresh
/// from `memories`, so a later re-read at verify time reflects any in-place
/// tampering instead of trusting a value handed in by the caller.
pub fn append_record(
    conn: &Connection,
    owner_id: &str,
    entry_id: &str,
    memory_id: &str,
    kind: ChainRecordKind,
) -> LoomResult<ChainRecord> {
    let memory = memory_ops::get_memory(conn, memory_id)?
        .ok_or_else(|| LoomError::NotFound { id: memory_id.to_string() })?;

    let (tip_sequence, previous_hash) = chain_tip(conn, owner_id)?;
    let created_at = Utc::now();
    let this_hash = ChainRecord::compute_hash(
        &previous_hash,
        memory_id,
        &memory.content_hash,
        kind,
        created_at,
        memory.valid_until,
    );
    let sequence = tip_sequence + 1;

    conn.execute(
        "INSERT INTO chain_records (owner_id, sequence, previous_hash, this_hash, entry_id, memory_id, kind, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![owner_id, sequence as i64, previous_hash, this_hash, entry_id, memory_id, kind_str(kind), created_at.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(ChainRecord {
        owner_id: owner_id.to_string(),
        sequence,
        previous_hash,
        this_hash,
        entry_id: entry_id.to_string(),
        memory_id: memory_id.to_string(),
        kind,
        created_at,
    })
}

/// Walk an owner's chain end to end, recomputing each hash from its
/// predecessor and the *current* state of the chained memory (§4.9
/// `verify`). A memory edited in place after being chained, or deleted
/// outright, breaks the chain at that sequence.
pub fn verify_chain(conn: &Connection, owner_id: &str) -> LoomResult<ChainVerification> {
    let mut stmt = conn
        .prepare("SELECT * FROM chain_records WHERE owner_id = ?1 ORDER BY sequence ASC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let records = stmt
        .query_map(params![owner_id], row_to_record)
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut expected_previous = CHAIN_GENESIS_HASH.to_string();
    for record in &records {
        if record.previous_hash != expected_previous {
            return Ok(ChainVerification::Broken { at_sequence: record.sequence });
        }

        let Some(memory) = memory_ops::get_memory(conn, &record.memory_id)? else {
            return Ok(ChainVerification::Broken { at_sequence: record.sequence });
        };

        let recomputed = ChainRecord::compute_hash(
            &record.previous_hash,
            &record.memory_id,
            &memory.content_hash,
            record.kind,
            record.created_at,
            memory.valid_until,
        );
        if recomputed != record.this_hash {
            return Ok(ChainVerification::Broken { at_sequence: record.sequence });
        }
        expected_previous = record.this_hash.clone();
    }
    Ok(ChainVerification::Ok)
}
