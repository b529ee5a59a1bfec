//! Directed typed edges between entries (§3, §4.3's closed-plus-extensible
//! vocabulary).

use serde::{Deserialize, Serialize};

/// A relationship type. The vocabulary is closed for the well-known kinds
/// used by the claimable-task and blocking-chain flows, but extensible via
/// [`RelationshipType::Other`] for callers that need a bespoke edge kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    ClaimedBy,
    AssignedTo,
    Blocks,
    DependsOn,
    PartOf,
    Other(String),
}

impl RelationshipType {
    /// Types over which transitive-closure queries are supported (§3).
    pub fn supports_transitive_closure(&self) -> bool {
        matches!(self, RelationshipType::Blocks | RelationshipType::DependsOn)
    }

    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        match self {
            RelationshipType::ClaimedBy => "claimed_by".into(),
            RelationshipType::AssignedTo => "assigned_to".into(),
            RelationshipType::Blocks => "blocks".into(),
            RelationshipType::DependsOn => "depends_on".into(),
            RelationshipType::PartOf => "part_of".into(),
            RelationshipType::Other(s) => s.clone().into(),
        }
    }
}

/// A directed typed edge, unique by `{source, target, type}` (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub source_entry_id: String,
    pub target_entry_id: String,
    pub relationship_type: RelationshipType,
    pub metadata: Option<serde_json::Value>,
}
