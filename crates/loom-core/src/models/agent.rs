//! Agent identity and provenance.
//!
//! # Examples
//!
//! ```
//! use loom_core::models::agent::{AgentLevel, Provenance};
//!
//! let prov = Provenance::new("code-assistant", "1.4.0", "host-a1b2");
//! assert_eq!(prov.agent_kind, "code-assistant");
//! assert!(prov.sub_agent.is_none());
//! ```

use serde::{Deserialize, Serialize};

/// Identity headers carried on every Store request (§6). These four values
/// are fixed for the lifetime of a connection/request and MUST NOT be
/// forgeable by code downstream of the provenance client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Provenance {
    pub agent_kind: String,
    pub agent_version: String,
    pub instance_id: String,
    pub sub_agent: Option<String>,
}

impl Provenance {
    pub fn new(
        agent_kind: impl Into<String>,
        agent_version: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            agent_kind: agent_kind.into(),
            agent_version: agent_version.into(),
            instance_id: instance_id.into(),
            sub_agent: None,
        }
    }

    pub fn with_sub_agent(mut self, sub_agent: impl Into<String>) -> Self {
        self.sub_agent = Some(sub_agent.into());
        self
    }
}

/// The three levels at which a person-as-agent entry can exist (§3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentLevel {
    /// e.g. "code-assistant" — a whole category of agent.
    Type,
    /// One running process on one host.
    Instance,
    /// A named role executing under a parent instance.
    SubAgent,
}

/// A person-typed Entry representing an agent at one of the three levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRegistration {
    pub id: String,
    pub name: String,
    pub level: AgentLevel,
    pub parent_id: Option<String>,
    pub capabilities: Vec<String>,
}
