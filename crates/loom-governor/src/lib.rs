//! Injection Governor (C3): the decision pipeline that runs at the start
//! of every agent turn — locate session, check the injection budget, try
//! retrieval then fallback, guard size and nesting, record the outcome
//! (§4.3). The whole decision is bounded by a 5 s wall-clock budget;
//! timing out is treated the same as "nothing to inject".

use std::path::Path;
use std::time::Duration;

use loom_core::constants::GOVERNOR_DECISION_BUDGET_SECS;
use loom_core::session_pointer::resolve_main_session;
use loom_core::LoomConfig;
use loom_coord::{CoordinationStore, InjectionSource};

const RETRIEVED_CONTEXT_HEADER: &str = "Retrieved Context";

pub struct Governor<'a> {
    pub coord: &'a CoordinationStore,
    pub client: &'a loom_client::LoomClient,
    pub config: &'a LoomConfig,
    pub pointer_path: &'a Path,
    pub sessions_dir: &'a Path,
    pub agent_kind: &'a str,
}

impl<'a> Governor<'a> {
    /// Runs the full decision pipeline, returning the context block to
    /// inject, or `None` if injection should be skipped. The session is
    /// located from the host's main-session pointer (§4.3 step 1).
    pub async fn decide(&self) -> Option<String> {
        match tokio::time::timeout(Duration::from_secs(GOVERNOR_DECISION_BUDGET_SECS), self.decide_inner()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::debug!("injection decision timed out, skipping");
                None
            }
        }
    }

    async fn decide_inner(&self) -> Option<String> {
        let session = resolve_main_session(self.pointer_path, self.sessions_dir, self.agent_kind)?;
        let session_id = session.session_id.as_str();

        let birth = session_birth(&session.session_file)?;
        let now = chrono::Utc::now();
        let decision = self.coord.check_injection(session_id, birth, now);
        if !decision.allowed {
            tracing::debug!(session_id, reason = ?decision.reason, "injection denied by coordination store");
            return None;
        }

        let (content, source) = if let Some(content) =
            loom_retriever::retrieve(&session.session_file, self.client, &self.config.retrieval).await
        {
            (content, InjectionSource::Retrieval)
        } else if self.config.fallback_enabled {
            let content = loom_fallback::recover(self.sessions_dir, &self.config.fallback)?;
            (content, InjectionSource::Fallback)
        } else {
            return None;
        };

        if content.len() > self.config.retrieval.max_context_chars {
            tracing::debug!(session_id, len = content.len(), "context block exceeds size guard, skipping");
            return None;
        }
        if content.matches(RETRIEVED_CONTEXT_HEADER).count() > 1 {
            tracing::warn!(session_id, "nested injection detected, skipping");
            return None;
        }

        self.coord.record_injection(session_id, source, now);
        Some(content)
    }
}

fn session_birth(path: &Path) -> Option<chrono::DateTime<chrono::Utc>> {
    let metadata = std::fs::metadata(path).ok()?;
    let created = metadata.created().or_else(|_| metadata.modified()).ok()?;
    Some(chrono::DateTime::<chrono::Utc>::from(created))
}
