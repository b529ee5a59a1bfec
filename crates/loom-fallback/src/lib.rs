//! Fallback Recoverer (C5): scans the host's session-files directory when
//! the Smart Retriever (C4) finds nothing, and emits a bounded,
//! trailing-N-messages recovery block (§4.5).

mod blocklist;
mod format;
mod scan;

use std::path::Path;

use loom_core::config::FallbackConfig;

pub use format::format_recovered_block;
pub use scan::RecoveredMessage;

/// Runs the full scan-filter-trim pipeline. Returns `None` if fewer than
/// `min_message_count` messages survive filtering (§4.5).
pub fn recover(sessions_dir: &Path, config: &FallbackConfig) -> Option<String> {
    let mut messages = scan::scan_messages(sessions_dir, config);
    messages.sort_by_key(|m| m.timestamp);

    let target = config.target_message_count.min(config.max_message_count);
    if messages.len() > target {
        let drop = messages.len() - target;
        messages.drain(0..drop);
    }

    if messages.len() < config.min_message_count {
        tracing::debug!(count = messages.len(), "fallback recovery below minimum survivor count");
        return None;
    }

    Some(format_recovered_block(&messages))
}
