//! Bounded context-block formatting (§4.4): titles only, never raw memory
//! bodies, so growth stays predictable regardless of memory size.

use chrono::{DateTime, Utc};
use loom_core::models::{SearchHit, SearchType};

pub fn format_context_block(
    query: &str,
    retrieved_at: DateTime<Utc>,
    search_type: SearchType,
    hits: &[SearchHit],
) -> String {
    let mut block = String::new();
    block.push_str("=== Retrieved Context ===\n");
    block.push_str(&format!("query: {query}\n"));
    block.push_str(&format!("retrieved_at: {}\n", retrieved_at.to_rfc3339()));
    block.push_str(&format!("search_type: {search_type:?}\n"));
    block.push_str(&format!("count: {}\n\n", hits.len()));
    for (i, hit) in hits.iter().enumerate() {
        let pct = (hit.relevance * 100.0).round() as i64;
        block.push_str(&format!("{}. {} (relevance {}%)\n", i + 1, hit.title, pct));
    }
    block.push_str("\n=== End Retrieved Context ===\n");
    block
}
