//! The shapes persisted in the coordination state file (§6: "Coordination
//! state file"). Lives in `loom-core` (rather than `loom-coord`) because
//! both the client runtime and any diagnostics tooling need to read it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current schema version of the coordination state file. Bumped whenever
/// a field is added or renamed; [`crate::config`] callers migrate older
/// files forward on read (§6).
pub const COORDINATION_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CircuitBreakerState {
    pub consecutive_failures: u32,
    pub backoff_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RateWindowState {
    pub window_start: Option<DateTime<Utc>>,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionInjectionRecord {
    pub count: u32,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_file_birth_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoordinationStats {
    pub lifetime_injections: u64,
    pub lifetime_searches: u64,
    pub search_hits: u64,
    pub fallbacks: u64,
}

/// The full on-disk coordination state (§3, §6). Rewritten atomically
/// (temp file + rename) under the sidecar lock on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationState {
    pub version: u32,
    pub last_injection_time: Option<DateTime<Utc>>,
    pub circuit_breaker: CircuitBreakerState,
    #[serde(default)]
    pub agent_rate_windows: HashMap<String, RateWindowState>,
    pub session_injection_counts: HashMap<String, SessionInjectionRecord>,
    pub stats: CoordinationStats,
}

impl Default for CoordinationState {
    fn default() -> Self {
        Self {
            version: COORDINATION_SCHEMA_VERSION,
            last_injection_time: None,
            circuit_breaker: CircuitBreakerState::default(),
            agent_rate_windows: HashMap::new(),
            session_injection_counts: HashMap::new(),
            stats: CoordinationStats::default(),
        }
    }
}

impl CoordinationState {
    /// Migrate an older schema forward. Unknown/missing fields already
    /// deserialize to defaults via `#[serde(default)]`; this is the place
    /// to add explicit transformations as the schema grows.
    pub fn migrate(mut self) -> Self {
        if self.version == 0 {
            self.version = COORDINATION_SCHEMA_VERSION;
        }
        self
    }
}
