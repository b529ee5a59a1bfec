//! The Store's base unit: [`Entry`], its [`Representation`]s, and [`Asset`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::agent::Provenance;

/// Closed set of entry types (§3). Immutable once an entry is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    ChatLog,
    Task,
    Memory,
    Note,
    Person,
    Project,
    EntryGroup,
    Config,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::ChatLog => "chat_log",
            EntryType::Task => "task",
            EntryType::Memory => "memory",
            EntryType::Note => "note",
            EntryType::Person => "person",
            EntryType::Project => "project",
            EntryType::EntryGroup => "entry_group",
            EntryType::Config => "config",
        }
    }
}

/// The Store's base unit (§3). Type and provenance are immutable after
/// creation; `version` strictly increases on any mutation of
/// representations or attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub public_id: String,
    pub owner_id: String,
    pub entry_type: EntryType,
    pub title: String,
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
    pub provenance: Option<Provenance>,
    /// `this_hash` from the memory chain (C9), when the owner is in
    /// trusted-memory mode. `None` otherwise.
    pub chain_hash: Option<String>,
}

impl Entry {
    pub fn new(owner_id: impl Into<String>, entry_type: EntryType, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            public_id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            entry_type,
            title: title.into(),
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
            version: 1,
            provenance: None,
            chain_hash: None,
        }
    }

    /// Bump the revision counter and `updated_at`. Called on every mutation
    /// of representations or attributes (invariant iii in §3).
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

/// Alternate renderings owned 1:n by an [`Entry`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationForm {
    Markdown,
    Html,
    Jsonl,
}

/// Content in a specific form. The `jsonl` form is append-only and is what
/// the chat-stream syncer (C6) grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Representation {
    pub id: String,
    pub entry_id: String,
    pub form: RepresentationForm,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An opaque blob owned by an entry (images, attachments, …). Out of scope
/// for the coordination runtime beyond carrying a reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub entry_id: String,
    pub content_type: String,
    pub byte_len: u64,
    pub storage_key: String,
}
