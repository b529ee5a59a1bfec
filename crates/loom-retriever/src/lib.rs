//! Smart Retriever (C4): builds a query from the last few user turns, runs
//! a hybrid search through the Provenance Client, and formats a bounded,
//! title-only context block (§4.4).
//!
//! Any failure — read error, empty query, transport error, or an
//! all-below-threshold result set — yields `None` so the governor (C3) can
//! fall through to the Fallback Recoverer (C5).

mod format;
mod query;
mod session_read;

use std::path::Path;

use loom_client::LoomClient;
use loom_core::config::RetrievalConfig;
use loom_core::models::{SearchRequest, SearchType};

pub use format::format_context_block;
pub use query::build_query;

/// Reads the session file, builds a query, searches, and formats a context
/// block. Returns `None` on any failure along the way (§4.4).
pub async fn retrieve(
    session_path: &Path,
    client: &LoomClient,
    config: &RetrievalConfig,
) -> Option<String> {
    let records = session_read::read_session(session_path, config.query_window_messages * 50).ok()?;
    let user_texts = query::last_user_messages(&records, config.query_window_messages);
    let query_text = build_query(&user_texts, config)?;

    let request = SearchRequest {
        query: query_text.clone(),
        search_type: SearchType::Hybrid,
        limit: config.search_limit,
        semantic_weight: Some(config.semantic_weight),
        keyword_weight: Some(config.keyword_weight),
        include_agents: None,
        exclude_agents: None,
        threshold: Some(config.relevance_threshold),
    };

    let response = match client.search(request).await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, "retrieval search failed");
            return None;
        }
    };

    let hits: Vec<_> = response
        .hits
        .into_iter()
        .filter(|h| h.relevance >= config.relevance_threshold)
        .collect();
    if hits.is_empty() {
        return None;
    }

    let block = format_context_block(&query_text, chrono::Utc::now(), response.search_type, &hits);
    if block.len() > config.max_context_chars {
        tracing::debug!(len = block.len(), "formatted context block exceeds size guard, dropping");
        return None;
    }
    Some(block)
}
