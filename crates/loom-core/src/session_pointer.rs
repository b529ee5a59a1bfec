//! Resolves the host runtime's "current main session" pointer file — a
//! small well-known JSON map keyed by `agent:{agent}:main` naming the
//! session currently active for that agent kind (§6, §4.3 step 1, §4.6).
//! Shared by the Injection Governor (C3) and the Chat-Stream Syncer (C6),
//! which additionally caches this read (§4.6).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct PointerEntry {
    #[serde(rename = "sessionId")]
    session_id: String,
    #[serde(rename = "sessionFile")]
    session_file: String,
}

/// The resolved main session: its id (for coordination-store bookkeeping)
/// and its transcript file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainSession {
    pub session_id: String,
    pub session_file: PathBuf,
}

/// Reads the pointer file and looks up the `agent:{agent_kind}:main` key.
/// Returns `None` if the pointer file is absent, malformed, or has no
/// entry for this agent kind (§4.3: "if absent, skip injection"). A
/// `sessionFile` value that isn't absolute is resolved under
/// `sessions_dir`.
pub fn resolve_main_session(pointer_path: &Path, sessions_dir: &Path, agent_kind: &str) -> Option<MainSession> {
    let raw = std::fs::read_to_string(pointer_path).ok()?;
    let map: HashMap<String, PointerEntry> = serde_json::from_str(&raw).ok()?;
    let key = format!("agent:{agent_kind}:main");
    let entry = map.get(&key)?;

    let candidate = PathBuf::from(&entry.session_file);
    let session_file = if candidate.is_absolute() { candidate } else { sessions_dir.join(candidate) };

    Some(MainSession { session_id: entry.session_id.clone(), session_file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_entry_for_agent_kind() {
        let dir = tempfile_dir();
        let pointer = dir.join("pointer.json");
        std::fs::write(
            &pointer,
            r#"{"agent:code-assistant:main": {"sessionId": "s1", "sessionFile": "s1.jsonl"}}"#,
        )
        .unwrap();
        let resolved = resolve_main_session(&pointer, &dir, "code-assistant").unwrap();
        assert_eq!(resolved.session_id, "s1");
        assert_eq!(resolved.session_file, dir.join("s1.jsonl"));
    }

    #[test]
    fn missing_pointer_file_yields_none() {
        let dir = tempfile_dir();
        let pointer = dir.join("absent.json");
        assert!(resolve_main_session(&pointer, &dir, "code-assistant").is_none());
    }

    #[test]
    fn missing_agent_key_yields_none() {
        let dir = tempfile_dir();
        let pointer = dir.join("pointer.json");
        std::fs::write(&pointer, r#"{"agent:other:main": {"sessionId": "s1", "sessionFile": "s1.jsonl"}}"#).unwrap();
        assert!(resolve_main_session(&pointer, &dir, "code-assistant").is_none());
    }

    fn tempfile_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("loom-session-pointer-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
