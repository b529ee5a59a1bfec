//! The search facade's (C11) request/response contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Hybrid,
    Semantic,
    Keyword,
    Atomic,
    MemoryHybrid,
}

impl Default for SearchType {
    fn default() -> Self {
        SearchType::Hybrid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub search_type: SearchType,
    pub limit: usize,
    pub semantic_weight: Option<f64>,
    pub keyword_weight: Option<f64>,
    pub include_agents: Option<Vec<String>>,
    pub exclude_agents: Option<Vec<String>>,
    pub threshold: Option<f64>,
}

/// Attribution carried on every search result (§3, §4.11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribution {
    pub agent_kind: String,
    pub agent_version: String,
    pub created_at: DateTime<Utc>,
    pub derivation_depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub entry_id: String,
    pub title: String,
    pub relevance: f64,
    pub attribution: Attribution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub search_type: SearchType,
}
