//! The per-owner memory hash chain (C9).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChainRecordKind {
    Create,
    Supersede,
}

/// One append-only chain record (§3). `this_hash = H(previous_hash ‖
/// canonical(entry))`, where `canonical(entry)` is the chained memory's own
/// content hash and validity window, not just its id — otherwise tampering
/// with the memory in place would leave the chain looking intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRecord {
    pub owner_id: String,
    pub sequence: u64,
    pub previous_hash: String,
    pub this_hash: String,
    pub entry_id: String,
    pub memory_id: String,
    pub kind: ChainRecordKind,
    pub created_at: DateTime<Utc>,
}

/// Genesis previous-hash for an owner's first chain record.
pub const CHAIN_GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

impl ChainRecord {
    /// Compute `H(previous_hash ‖ canonical(memory_id, content_hash, kind,
    /// created_at, valid_until))`. Callers pass the chained memory's
    /// *current* content hash and validity window, so recomputing this at
    /// verify time against the live memory row is what catches in-place
    /// tampering (§4.9, §8 "verifiable per-owner hash chain").
    pub fn compute_hash(
        previous_hash: &str,
        memory_id: &str,
        content_hash: &str,
        kind: ChainRecordKind,
        created_at: DateTime<Utc>,
        valid_until: Option<DateTime<Utc>>,
    ) -> String {
        let canonical = format!(
            "{previous_hash}\u{1}{memory_id}\u{1}{content_hash}\u{1}{:?}\u{1}{}\u{1}{}",
            kind,
            created_at.to_rfc3339(),
            valid_until.map(|v| v.to_rfc3339()).unwrap_or_default(),
        );
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}

/// Outcome of walking an owner's chain end to end (C9 `verify`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChainVerification {
    Ok,
    Broken { at_sequence: u64 },
}
