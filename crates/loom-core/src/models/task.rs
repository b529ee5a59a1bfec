//! GTD task buckets and claim outcomes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GtdBucket {
    Inbox,
    NextActions,
    WaitingFor,
    SomedayMaybe,
}

/// Result of `claim-task`: exclusive, at most one `claimed_by` edge wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResult {
    pub ok: bool,
    pub claimed: bool,
    pub reason: Option<String>,
}

impl ClaimResult {
    pub fn won() -> Self {
        Self { ok: true, claimed: true, reason: None }
    }

    pub fn already_claimed() -> Self {
        Self {
            ok: false,
            claimed: false,
            reason: Some("already_claimed".to_string()),
        }
    }
}
