//! Configuration for the smart retriever (C4) and fallback recoverer (C5).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of trailing user-role messages considered when building a query.
    pub query_window_messages: usize,
    /// Hard cap on the built query string.
    pub query_max_chars: usize,
    /// Weight given to semantic similarity in hybrid search.
    pub semantic_weight: f64,
    /// Weight given to keyword overlap in hybrid search.
    pub keyword_weight: f64,
    /// Maximum results requested per search.
    pub search_limit: usize,
    /// Request budget for one search call.
    pub search_timeout_secs: u64,
    /// Results below this similarity are dropped.
    pub relevance_threshold: f64,
    /// Reject a formatted context block larger than this.
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            query_window_messages: 3,
            query_max_chars: 500,
            semantic_weight: 0.7,
            keyword_weight: 0.3,
            search_limit: 10,
            search_timeout_secs: 8,
            relevance_threshold: 0.5,
            max_context_chars: 50_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Only session files modified within this window are scanned.
    pub window_hours: u64,
    /// Hard ceiling on `window_hours`, regardless of caller override.
    pub window_ceiling_hours: u64,
    /// Session files larger than this are skipped.
    pub max_file_size_bytes: u64,
    /// At most this many files are scanned per invocation.
    pub max_files: usize,
    /// At most this many JSONL lines are parsed per file.
    pub max_lines_per_file: usize,
    /// Stop early once this many bytes have been read across all files.
    pub max_total_bytes: u64,
    /// Number of trailing messages to return.
    pub target_message_count: usize,
    /// Hard ceiling on the number of messages returned.
    pub max_message_count: usize,
    /// Below this many surviving messages, return nothing.
    pub min_message_count: usize,
    /// Message bodies longer than this are truncated.
    pub max_message_chars: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            window_hours: 12,
            window_ceiling_hours: 168,
            max_file_size_bytes: 5 * 1024 * 1024,
            max_files: 100,
            max_lines_per_file: 10_000,
            max_total_bytes: 100 * 1024 * 1024,
            target_message_count: 30,
            max_message_count: 100,
            min_message_count: 3,
            max_message_chars: 4_000,
        }
    }
}
