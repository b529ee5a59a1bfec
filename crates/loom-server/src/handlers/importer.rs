//! Session Importer (C10): `POST /openclaw/import`,
//! `POST /openclaw/import/file`, `GET /openclaw/import/preview` (§4.10, §6).
//!
//! Listing walks `{root}/agents/{agentKind}/sessions/{sessionId}.jsonl`
//! (directory-scan shape grounded the same way as the fallback
//! recoverer's `walkdir::WalkDir` scan); import enqueues one job per file,
//! sorted by earliest-message instant ascending, onto a queue kept at
//! `ImporterConfig.queue_concurrency` (1) to preserve chain order (§4.9).
//! Each file import is idempotent via [`find_or_create_chat_log`]'s
//! external-key short-circuit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loom_core::errors::LoomError;
use loom_core::models::{ChatMessage, ExternalSessionKey, SessionRecord};

use super::chat_stream::{append_to_entry, find_or_create_chat_log};
use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct SessionFile {
    pub path: String,
    pub agent_kind: String,
    pub session_id: String,
    pub earliest_instant: DateTime<Utc>,
    pub message_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub agent_kind: Option<String>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dry_run: bool,
}

fn session_root(state: &AppState) -> ApiResult<PathBuf> {
    state
        .server_config
        .openclaw_sessions_root
        .clone()
        .ok_or_else(|| ApiError(LoomError::Config("openclaw sessions root not configured".to_string())))
}

/// Scan one candidate file's `message`-kind records for its earliest
/// timestamp and message count. Returns `None` for a file with no
/// readable message records.
fn scan_session_file(path: &Path) -> Option<(DateTime<Utc>, u64)> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut earliest: Option<DateTime<Utc>> = None;
    let mut count = 0u64;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<SessionRecord>(line) else { continue };
        if record.kind != "message" {
            continue;
        }
        count += 1;
        if let Some(ts) = record.timestamp {
            earliest = Some(match earliest {
                Some(existing) if existing <= ts => existing,
                _ => ts,
            });
        }
    }
    earliest.map(|e| (e, count))
}

/// `.../agents/{agentKind}/sessions/{sessionId}.jsonl` → `(agentKind, sessionId)`.
fn parse_session_path(root: &Path, path: &Path) -> Option<(String, String)> {
    let agents_dir = root.join("agents");
    let relative = path.strip_prefix(&agents_dir).ok()?;
    let mut components = relative.components();
    let agent_kind = components.next()?.as_os_str().to_str()?.to_string();
    let sessions_dir = components.next()?.as_os_str().to_str()?;
    if sessions_dir != "sessions" {
        return None;
    }
    let file_name = components.next()?.as_os_str().to_str()?;
    if components.next().is_some() {
        return None;
    }
    let session_id = file_name.strip_suffix(".jsonl")?.to_string();
    Some((agent_kind, session_id))
}

fn list_session_files(root: &Path, filter: &ListQuery) -> Vec<SessionFile> {
    let agents_dir = root.join("agents");
    walkdir::WalkDir::new(&agents_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|entry| {
            let (agent_kind, session_id) = parse_session_path(root, entry.path())?;
            if let Some(wanted) = &filter.agent_kind {
                if wanted != &agent_kind {
                    return None;
                }
            }
            let (earliest_instant, message_count) = scan_session_file(entry.path())?;
            if let Some(after) = filter.after {
                if earliest_instant < after {
                    return None;
                }
            }
            if let Some(before) = filter.before {
                if earliest_instant > before {
                    return None;
                }
            }
            Some(SessionFile {
                path: entry.path().to_string_lossy().to_string(),
                agent_kind,
                session_id,
                earliest_instant,
                message_count,
            })
        })
        .collect()
}

pub async fn import_preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<SessionFile>>> {
    let root = session_root(&state)?;
    let mut files = list_session_files(&root, &query);
    files.sort_by_key(|f| f.earliest_instant);
    Ok(Json(files))
}

#[derive(Debug, Serialize)]
pub struct FileImportResult {
    pub path: String,
    pub ok: bool,
    pub already_existed: bool,
    pub entry_id: Option<String>,
    pub messages_imported: u64,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub dry_run: bool,
    pub files: Vec<FileImportResult>,
}

pub async fn import_all(
    State(state): State<Arc<AppState>>,
    Identity(provenance): Identity,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ImportSummary>> {
    let root = session_root(&state)?;
    let mut files = list_session_files(&root, &query);
    files.sort_by_key(|f| f.earliest_instant);

    if query.dry_run {
        let results = files
            .into_iter()
            .map(|f| FileImportResult {
                path: f.path,
                ok: true,
                already_existed: false,
                entry_id: None,
                messages_imported: 0,
                error: None,
            })
            .collect();
        return Ok(Json(ImportSummary { dry_run: true, files: results }));
    }

    // Single-concurrency queue (`ImporterConfig.queue_concurrency`): files
    // import strictly in order, one at a time, so a trusted-memory
    // owner's chain never forks across two files importing concurrently.
    let mut results = Vec::with_capacity(files.len());
    for file in files.drain(..) {
        let result = import_one_file(&state, &provenance, Path::new(&file.path)).await;
        results.push(match result {
            Ok((already_existed, entry_id, messages_imported)) => FileImportResult {
                path: file.path,
                ok: true,
                already_existed,
                entry_id: Some(entry_id),
                messages_imported,
                error: None,
            },
            Err(error) => FileImportResult {
                path: file.path,
                ok: false,
                already_existed: false,
                entry_id: None,
                messages_imported: 0,
                error: Some(error.0.to_string()),
            },
        });
    }

    Ok(Json(ImportSummary { dry_run: false, files: results }))
}

#[derive(Debug, Deserialize)]
pub struct ImportFileRequest {
    pub path: String,
}

pub async fn import_file(
    State(state): State<Arc<AppState>>,
    Identity(provenance): Identity,
    Json(body): Json<ImportFileRequest>,
) -> ApiResult<Json<FileImportResult>> {
    let (already_existed, entry_id, messages_imported) =
        import_one_file(&state, &provenance, Path::new(&body.path)).await?;
    Ok(Json(FileImportResult {
        path: body.path,
        ok: true,
        already_existed,
        entry_id: Some(entry_id),
        messages_imported,
        error: None,
    }))
}

/// Import one session file, idempotent on the external key
/// `openclaw:{agentKind}:{sessionId}` (§4.10). Returns
/// `(already_existed, entry_id, messages_imported)`.
async fn import_one_file(
    state: &Arc<AppState>,
    provenance: &loom_core::models::Provenance,
    path: &Path,
) -> ApiResult<(bool, String, u64)> {
    let owner_id = provenance.instance_id.clone();
    let root = session_root(state)?;
    let (agent_kind, session_id) = parse_session_path(&root, path)
        .ok_or_else(|| ApiError(LoomError::Validation(format!("not a session path: {}", path.display()))))?;
    let external_key = ExternalSessionKey::new("openclaw", agent_kind, session_id).as_string();

    if let Some(existing) = state.storage.find_entry_by_external_key(&owner_id, &external_key)? {
        return Ok((true, existing.id, 0));
    }

    let entry = find_or_create_chat_log(state, &owner_id, provenance, &external_key)?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError(LoomError::Validation(format!("could not read {}: {e}", path.display()))))?;

    let mut imported = 0u64;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<SessionRecord>(line) else { continue };
        if record.kind != "message" {
            continue;
        }
        let Some(role) = record.role else { continue };
        let Some(content) = &record.content else { continue };
        let message = ChatMessage {
            role,
            content: content.as_text(),
            timestamp: record.timestamp.unwrap_or_else(Utc::now),
            message_id: record.id.clone(),
            source: Some("openclaw_import".to_string()),
        };
        append_to_entry(state, &entry, &owner_id, message).await?;
        imported += 1;
    }

    Ok((false, entry.id, imported))
}
