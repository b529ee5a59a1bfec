//! Entry, representation, and asset CRUD (§3, §4.7).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use loom_core::errors::{LoomError, LoomResult, StorageError};
use loom_core::models::{Entry, EntryType, Provenance, Representation, RepresentationForm};

use crate::to_storage_err;

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<Entry> {
    let entry_type: String = row.get("entry_type")?;
    let metadata_json: String = row.get("metadata")?;
    let provenance_json: Option<String> = row.get("provenance")?;
    Ok(Entry {
        id: row.get("id")?,
        public_id: row.get("public_id")?,
        owner_id: row.get("owner_id")?,
        entry_type: parse_entry_type(&entry_type),
        title: row.get("title")?,
        metadata: serde_json::from_str(&metadata_json).unwrap_or_default(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        version: row.get::<_, i64>("version")? as u64,
        provenance: provenance_json.and_then(|s| serde_json::from_str(&s).ok()),
        chain_hash: row.get("chain_hash")?,
    })
}

fn parse_entry_type(s: &str) -> EntryType {
    match s {
        "chat_log" => EntryType::ChatLog,
        "task" => EntryType::Task,
        "memory" => EntryType::Memory,
        "note" => EntryType::Note,
        "person" => EntryType::Person,
        "project" => EntryType::Project,
        "entry_group" => EntryType::EntryGroup,
        _ => EntryType::Config,
    }
}

pub fn insert_entry(conn: &Connection, entry: &Entry) -> LoomResult<()> {
    let metadata_json = serde_json::to_string(&entry.metadata)?;
    let provenance_json = entry.provenance.as_ref().map(serde_json::to_string).transpose()?;
    conn.execute(
        "INSERT INTO entries (id, public_id, owner_id, entry_type, title, metadata, created_at, updated_at, version, provenance, chain_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            entry.id,
            entry.public_id,
            entry.owner_id,
            entry.entry_type.as_str(),
            entry.title,
            metadata_json,
            entry.created_at.to_rfc3339(),
            entry.updated_at.to_rfc3339(),
            entry.version as i64,
            provenance_json,
            entry.chain_hash,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_entry(conn: &Connection, id: &str) -> LoomResult<Option<Entry>> {
    conn.query_row("SELECT * FROM entries WHERE id = ?1", params![id], row_to_entry)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn find_entry_by_external_key(
    conn: &Connection,
    owner_id: &str,
    external_session_key: &str,
) -> LoomResult<Option<Entry>> {
    conn.query_row(
        "SELECT e.* FROM entries e
         WHERE e.owner_id = ?1 AND e.entry_type = 'chat_log'
           AND json_extract(e.metadata, '$.external_session_key') = ?2",
        params![owner_id, external_session_key],
        row_to_entry,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Bump `version`/`updated_at` and persist new `metadata`/`chain_hash`.
/// Rejects a change of `entry_type` (invariant i, §3).
pub fn update_entry(conn: &Connection, entry: &Entry) -> LoomResult<()> {
    let existing = get_entry(conn, &entry.id)?
        .ok_or_else(|| LoomError::NotFound { id: entry.id.clone() })?;
    if existing.entry_type.as_str() != entry.entry_type.as_str() {
        return Err(LoomError::ImmutableEntryType {
            id: entry.id.clone(),
            from: existing.entry_type.as_str().to_string(),
            to: entry.entry_type.as_str().to_string(),
        });
    }
    let metadata_json = serde_json::to_string(&entry.metadata)?;
    conn.execute(
        "UPDATE entries SET title = ?2, metadata = ?3, updated_at = ?4, version = ?5, chain_hash = ?6 WHERE id = ?1",
        params![
            entry.id,
            entry.title,
            metadata_json,
            entry.updated_at.to_rfc3339(),
            entry.version as i64,
            entry.chain_hash,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_entry(conn: &Connection, id: &str) -> LoomResult<()> {
    let affected = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    if affected == 0 {
        return Err(LoomError::Storage(StorageError::EntryNotFound { id: id.to_string() }));
    }
    Ok(())
}

fn row_to_representation(row: &rusqlite::Row) -> rusqlite::Result<Representation> {
    let form: String = row.get("form")?;
    Ok(Representation {
        id: row.get("id")?,
        entry_id: row.get("entry_id")?,
        form: parse_form(&form),
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_form(s: &str) -> RepresentationForm {
    match s {
        "html" => RepresentationForm::Html,
        "jsonl" => RepresentationForm::Jsonl,
        _ => RepresentationForm::Markdown,
    }
}

fn form_str(form: RepresentationForm) -> &'static str {
    match form {
        RepresentationForm::Markdown => "markdown",
        RepresentationForm::Html => "html",
        RepresentationForm::Jsonl => "jsonl",
    }
}

pub fn get_representation(
    conn: &Connection,
    entry_id: &str,
    form: RepresentationForm,
) -> LoomResult<Option<Representation>> {
    conn.query_row(
        "SELECT * FROM representations WHERE entry_id = ?1 AND form = ?2",
        params![entry_id, form_str(form)],
        row_to_representation,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Append one line to the entry's `jsonl` representation, creating it if
/// absent (§3: "the jsonl form is append-only"). Callers serialize this
/// call per entry (§5).
pub fn append_jsonl_line(conn: &Connection, entry_id: &str, line: &str, now: DateTime<Utc>) -> LoomResult<()> {
    match get_representation(conn, entry_id, RepresentationForm::Jsonl)? {
        Some(existing) => {
            let new_content = format!("{}{}\n", existing.content, line);
            conn.execute(
                "UPDATE representations SET content = ?2, updated_at = ?3 WHERE id = ?1",
                params![existing.id, new_content, now.to_rfc3339()],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO representations (id, entry_id, form, content, created_at, updated_at) VALUES (?1, ?2, 'jsonl', ?3, ?4, ?4)",
                params![id, entry_id, format!("{line}\n"), now.to_rfc3339()],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }
    Ok(())
}

/// Create a representation outright (§4.7's "entry creation with initial
/// content"). Unlike [`append_jsonl_line`] this always inserts a fresh
/// row; callers only use it once, right after `insert_entry`.
pub fn insert_representation(
    conn: &Connection,
    entry_id: &str,
    form: RepresentationForm,
    content: &str,
    now: DateTime<Utc>,
) -> LoomResult<()> {
    let id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO representations (id, entry_id, form, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![id, entry_id, form_str(form), content, now.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Count of lines currently stored in the entry's jsonl representation.
pub fn jsonl_line_count(conn: &Connection, entry_id: &str) -> LoomResult<u64> {
    match get_representation(conn, entry_id, RepresentationForm::Jsonl)? {
        Some(rep) => Ok(rep.content.lines().count() as u64),
        None => Ok(0),
    }
}
