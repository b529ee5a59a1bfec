//! An atomic fact extracted from an entry, and the candidate shape the
//! external extractor hands back to the derivation guard (C8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the five kinds a memory can be extracted as (§3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Fact,
    Preference,
    Event,
    Observation,
    Decision,
}

/// An atomic memory (§3). Confidence lives in `[0, 1]`; a non-null
/// `valid_until` means the memory has been superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub owner_id: String,
    pub source_entry_id: String,
    pub chunk_index: u32,
    pub kind: MemoryKind,
    pub content: String,
    pub confidence: f64,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub source_agent: String,
    pub derivation_depth: u32,
    pub derived_from: Option<String>,
    pub content_hash: String,
}

impl Memory {
    /// blake3 hash over the canonical (owner, content) pair, used by the
    /// derivation guard's duplicate check (§4.8).
    pub fn compute_content_hash(owner_id: &str, content: &str) -> String {
        let canonical = format!("{owner_id}\u{1}{content}");
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }

    pub fn is_superseded(&self) -> bool {
        self.valid_until.is_some()
    }
}

/// The candidate shape the external memory extractor hands back for one
/// source entry (design note: "Extractor as external collaborator").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCandidate {
    pub kind: MemoryKind,
    pub content: String,
    pub confidence: f64,
    pub chunk_index: u32,
    pub source_agent: String,
    pub derived_from: Option<String>,
}

/// Request body for `POST /memories/check-derivation` and the write path
/// that follows the same computation (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationRequest {
    pub owner_id: String,
    pub content: String,
    pub source_agent: String,
    pub derived_from_memory_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationCheck {
    pub duplicate: bool,
    pub depth: u32,
}
