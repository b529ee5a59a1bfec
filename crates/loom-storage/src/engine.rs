//! `StorageEngine`: the single entry point the Store side (loom-server)
//! opens against a database file and calls for every persistence need.

use std::path::Path;

use chrono::{DateTime, Utc};

use loom_core::errors::LoomResult;
use loom_core::models::{
    ChainRecord, ChainRecordKind, ChainVerification, Entry, Memory, MessageRole, Relationship,
    RelationshipType, Representation, RepresentationForm,
};

use crate::migrations::run_migrations;
use crate::pool::{ConnectionPool, ReadPool};
use crate::queries::chat_ops::ChatStreamCounters;
use crate::queries::{chain_ops, chat_ops, entry_ops, memory_ops, relationship_ops};

/// Owns the connection pool and exposes the operations the Store's HTTP
/// layer composes into `/api/v1` handlers.
pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    pub fn open(path: &Path, read_pool_size: usize) -> LoomResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        pool.writer.with_conn_sync(run_migrations)?;
        Ok(Self { pool })
    }

    pub fn open_in_memory(read_pool_size: usize) -> LoomResult<Self> {
        let pool = ConnectionPool::open_in_memory(read_pool_size)?;
        pool.writer.with_conn_sync(run_migrations)?;
        Ok(Self { pool })
    }

    fn readers(&self) -> &ReadPool {
        &self.pool.readers
    }

    // -- Entries ----------------------------------------------------------

    pub fn create_entry(&self, entry: &Entry) -> LoomResult<()> {
        self.pool.writer.with_conn_sync(|conn| entry_ops::insert_entry(conn, entry))
    }

    pub fn get_entry(&self, id: &str) -> LoomResult<Option<Entry>> {
        self.readers().with_conn(|conn| entry_ops::get_entry(conn, id))
    }

    pub fn find_entry_by_external_key(&self, owner_id: &str, external_key: &str) -> LoomResult<Option<Entry>> {
        self.readers()
            .with_conn(|conn| entry_ops::find_entry_by_external_key(conn, owner_id, external_key))
    }

    /// Load the entry, apply the given title/metadata changes, bump
    /// `version`/`updated_at`, and persist (invariant iii, §3).
    pub fn update_entry(
        &self,
        id: &str,
        title: Option<String>,
        metadata: Option<std::collections::HashMap<String, serde_json::Value>>,
    ) -> LoomResult<Entry> {
        self.pool.writer.with_conn_sync(|conn| {
            let mut entry = entry_ops::get_entry(conn, id)?
                .ok_or_else(|| loom_core::errors::LoomError::NotFound { id: id.to_string() })?;
            if let Some(title) = title {
                entry.title = title;
            }
            if let Some(metadata) = metadata {
                entry.metadata = metadata;
            }
            entry.touch();
            entry_ops::update_entry(conn, &entry)?;
            Ok(entry)
        })
    }

    pub fn delete_entry(&self, id: &str) -> LoomResult<()> {
        self.pool.writer.with_conn_sync(|conn| entry_ops::delete_entry(conn, id))
    }

    pub fn get_representation(&self, entry_id: &str, form: RepresentationForm) -> LoomResult<Option<Representation>> {
        self.readers().with_conn(|conn| entry_ops::get_representation(conn, entry_id, form))
    }

    /// Create an entry's initial representation (§4.7, `POST /entries`'s
    /// optional `content` field).
    pub fn create_representation(&self, entry_id: &str, form: RepresentationForm, content: &str) -> LoomResult<()> {
        let now = Utc::now();
        self.pool
            .writer
            .with_conn_sync(|conn| entry_ops::insert_representation(conn, entry_id, form, content, now))
    }

    /// Append one line to an entry's `jsonl` representation (C6, C7).
    pub fn append_jsonl_line(&self, entry_id: &str, line: &str) -> LoomResult<()> {
        let now = Utc::now();
        self.pool.writer.with_conn_sync(|conn| entry_ops::append_jsonl_line(conn, entry_id, line, now))
    }

    pub fn jsonl_line_count(&self, entry_id: &str) -> LoomResult<u64> {
        self.readers().with_conn(|conn| entry_ops::jsonl_line_count(conn, entry_id))
    }

    // -- Chat streams (C6) --------------------------------------------------

    pub fn get_chat_counters(&self, entry_id: &str) -> LoomResult<Option<ChatStreamCounters>> {
        self.readers().with_conn(|conn| chat_ops::get_counters(conn, entry_id))
    }

    pub fn record_chat_message(
        &self,
        entry_id: &str,
        role: MessageRole,
        at: DateTime<Utc>,
        message_id: &str,
    ) -> LoomResult<u64> {
        self.pool
            .writer
            .with_conn_sync(|conn| chat_ops::record_message(conn, entry_id, role, at, message_id))
    }

    /// Bump the counters for an appended message and report whether this
    /// append should enqueue an extraction pass (§4.7).
    pub fn record_chat_message_and_check_extraction(
        &self,
        entry_id: &str,
        role: MessageRole,
        at: DateTime<Utc>,
        message_id: &str,
        interval: u64,
        debounce_secs: i64,
    ) -> LoomResult<bool> {
        self.pool.writer.with_conn_sync(|conn| {
            chat_ops::record_message(conn, entry_id, role, at, message_id)?;
            let counters = chat_ops::get_counters(conn, entry_id)?
                .expect("record_message just created or updated this row");
            let should = chat_ops::should_enqueue_extraction(&counters, interval, debounce_secs, at);
            if should {
                chat_ops::mark_extraction_enqueued(conn, entry_id, at)?;
            }
            Ok(should)
        })
    }

    // -- Memories (C8) -------------------------------------------------------

    pub fn find_current_memory_by_content_hash(&self, owner_id: &str, content_hash: &str) -> LoomResult<Option<Memory>> {
        self.readers()
            .with_conn(|conn| memory_ops::find_current_by_content_hash(conn, owner_id, content_hash))
    }

    pub fn get_memory(&self, id: &str) -> LoomResult<Option<Memory>> {
        self.readers().with_conn(|conn| memory_ops::get_memory(conn, id))
    }

    pub fn insert_memory(&self, memory: &Memory) -> LoomResult<()> {
        self.pool.writer.with_conn_sync(|conn| memory_ops::insert_memory(conn, memory))
    }

    pub fn supersede_memory(&self, id: &str, at: DateTime<Utc>) -> LoomResult<()> {
        self.pool.writer.with_conn_sync(|conn| memory_ops::supersede_memory(conn, id, at))
    }

    /// Insert a memory and append the matching chain record in one
    /// writer-locked step, so the chain tip never races a concurrent append
    /// (§4.8, §4.9, §5).
    pub fn insert_memory_and_record(&self, memory: &Memory, entry_id: &str) -> LoomResult<ChainRecord> {
        self.pool.writer.with_conn_sync(|conn| {
            memory_ops::insert_memory(conn, memory)?;
            chain_ops::append_record(conn, &memory.owner_id, entry_id, &memory.id, ChainRecordKind::Create)
        })
    }

    pub fn supersede_memory_and_record(&self, id: &str, owner_id: &str, entry_id: &str, at: DateTime<Utc>) -> LoomResult<ChainRecord> {
        self.pool.writer.with_conn_sync(|conn| {
            memory_ops::supersede_memory(conn, id, at)?;
            chain_ops::append_record(conn, owner_id, entry_id, id, ChainRecordKind::Supersede)
        })
    }

    // -- Search (C11) ---------------------------------------------------------

    pub fn fts_search(&self, owner_id: &str, query: &str, limit: usize) -> LoomResult<Vec<(Memory, f64)>> {
        self.readers().with_conn(|conn| memory_ops::fts_search(conn, owner_id, query, limit))
    }

    pub fn list_current_memories(&self, owner_id: &str, limit: usize) -> LoomResult<Vec<Memory>> {
        self.readers().with_conn(|conn| memory_ops::list_current_for_owner(conn, owner_id, limit))
    }

    // -- Chain (C9) -------------------------------------------------------

    pub fn append_chain_record(&self, owner_id: &str, entry_id: &str, memory_id: &str, kind: ChainRecordKind) -> LoomResult<ChainRecord> {
        self.pool.writer.with_conn_sync(|conn| chain_ops::append_record(conn, owner_id, entry_id, memory_id, kind))
    }

    pub fn verify_chain(&self, owner_id: &str) -> LoomResult<ChainVerification> {
        self.readers().with_conn(|conn| chain_ops::verify_chain(conn, owner_id))
    }

    // -- Relationships (C3, C11) --------------------------------------------

    pub fn insert_relationship(&self, rel: &Relationship) -> LoomResult<()> {
        self.pool.writer.with_conn_sync(|conn| relationship_ops::insert_relationship(conn, rel))
    }

    pub fn claim_task(&self, task_id: &str, person_entry_id: &str) -> LoomResult<bool> {
        self.pool.writer.with_conn_sync(|conn| relationship_ops::claim_task(conn, task_id, person_entry_id))
    }

    pub fn list_relationships(&self, entry_id: &str, rel_type: Option<&RelationshipType>, outgoing: bool) -> LoomResult<Vec<Relationship>> {
        self.readers().with_conn(|conn| relationship_ops::list_relationships(conn, entry_id, rel_type, outgoing))
    }

    pub fn blocking_chain(&self, entry_id: &str) -> LoomResult<Vec<Relationship>> {
        self.readers().with_conn(|conn| relationship_ops::blocking_chain(conn, entry_id))
    }

    pub fn assigned_tasks(&self, person_id: &str, include_children: bool) -> LoomResult<Vec<String>> {
        self.readers().with_conn(|conn| relationship_ops::assigned_tasks(conn, person_id, include_children))
    }
}
