//! Typed directed edges and transitive closure over the blocking/dependency
//! subset (§3, §4.3).

use rusqlite::{params, Connection, OptionalExtension};

use loom_core::errors::{LoomError, LoomResult};
use loom_core::models::{Relationship, RelationshipType};

use crate::to_storage_err;

fn row_to_relationship(row: &rusqlite::Row) -> rusqlite::Result<Relationship> {
    let rel_type: String = row.get("relationship_type")?;
    let metadata_json: Option<String> = row.get("metadata")?;
    Ok(Relationship {
        id: row.get("id")?,
        source_entry_id: row.get("source_entry_id")?,
        target_entry_id: row.get("target_entry_id")?,
        relationship_type: parse_type(&rel_type),
        metadata: metadata_json.and_then(|s| serde_json::from_str(&s).ok()),
    })
}

fn parse_type(s: &str) -> RelationshipType {
    match s {
        "claimed_by" => RelationshipType::ClaimedBy,
        "assigned_to" => RelationshipType::AssignedTo,
        "blocks" => RelationshipType::Blocks,
        "depends_on" => RelationshipType::DependsOn,
        "part_of" => RelationshipType::PartOf,
        other => RelationshipType::Other(other.to_string()),
    }
}

pub fn insert_relationship(conn: &Connection, rel: &Relationship) -> LoomResult<()> {
    let type_str = rel.relationship_type.as_str().into_owned();
    let metadata_json = rel.metadata.as_ref().map(serde_json::to_string).transpose()?;
    let result = conn.execute(
        "INSERT INTO relationships (id, source_entry_id, target_entry_id, relationship_type, metadata) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![rel.id, rel.source_entry_id, rel.target_entry_id, type_str, metadata_json],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Err(LoomError::DuplicateRelationship {
                source: rel.source_entry_id.clone(),
                target: rel.target_entry_id.clone(),
                relationship_type: type_str,
            })
        }
        Err(e) => Err(to_storage_err(e.to_string())),
    }
}

/// Replace the current `claimed_by` edge for a task, enforcing exclusivity
/// (§3 Claimable Task, §8 scenario 2). Runs inside the caller's write-serial
/// section so only one of two racing claimants wins.
pub fn claim_task(conn: &Connection, task_id: &str, person_entry_id: &str) -> LoomResult<bool> {
    let already: Option<String> = conn
        .query_row(
            "SELECT id FROM relationships WHERE source_entry_id = ?1 AND relationship_type = 'claimed_by'",
            params![task_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if already.is_some() {
        return Ok(false);
    }
    let id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO relationships (id, source_entry_id, target_entry_id, relationship_type, metadata) VALUES (?1, ?2, ?3, 'claimed_by', NULL)",
        params![id, task_id, person_entry_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(true)
}

pub fn list_relationships(
    conn: &Connection,
    entry_id: &str,
    rel_type: Option<&RelationshipType>,
    outgoing: bool,
) -> LoomResult<Vec<Relationship>> {
    let column = if outgoing { "source_entry_id" } else { "target_entry_id" };
    let (sql, type_filter) = match rel_type {
        Some(t) => (
            format!("SELECT * FROM relationships WHERE {column} = ?1 AND relationship_type = ?2"),
            Some(t.as_str().into_owned()),
        ),
        None => (format!("SELECT * FROM relationships WHERE {column} = ?1"), None),
    };
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = match &type_filter {
        Some(t) => stmt
            .query_map(params![entry_id, t], row_to_relationship)
            .map_err(|e| to_storage_err(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>(),
        None => stmt
            .query_map(params![entry_id], row_to_relationship)
            .map_err(|e| to_storage_err(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>(),
    };
    rows.map_err(|e| to_storage_err(e.to_string()))
}

/// Transitive closure over `blocks`/`depends_on` edges starting at
/// `entry_id`, following outgoing edges (§3, §4.3,
/// `GET /entries/:id/relationships/blocking-chain`).
pub fn blocking_chain(conn: &Connection, entry_id: &str) -> LoomResult<Vec<Relationship>> {
    let mut stmt = conn
        .prepare(
            "WITH RECURSIVE chain(id) AS (
                SELECT ?1
                UNION
                SELECT r.target_entry_id FROM relationships r
                JOIN chain c ON r.source_entry_id = c.id
                WHERE r.relationship_type IN ('blocks', 'depends_on')
            )
            SELECT r.* FROM relationships r
            WHERE r.source_entry_id IN (SELECT id FROM chain)
              AND r.relationship_type IN ('blocks', 'depends_on')",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![entry_id], row_to_relationship)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Tasks assigned (directly, or via `include_children` for sub-agents) to a
/// person entry (§3 Person-as-Agent, `GET /persons/:id/assigned-tasks`).
pub fn assigned_tasks(conn: &Connection, person_id: &str, include_children: bool) -> LoomResult<Vec<String>> {
    let sql = if include_children {
        "SELECT DISTINCT r.source_entry_id FROM relationships r
         WHERE r.relationship_type = 'assigned_to'
           AND r.target_entry_id IN (
               SELECT ?1
               UNION
               SELECT id FROM entries WHERE json_extract(metadata, '$.parent_id') = ?1
           )"
    } else {
        "SELECT source_entry_id FROM relationships WHERE relationship_type = 'assigned_to' AND target_entry_id = ?1"
    };
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![person_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
