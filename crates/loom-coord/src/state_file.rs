//! Atomic read/write of the coordination state file (§6: "Coordination
//! state file"). Any read failure yields defaults rather than propagating
//! (§4.1 failure semantics); writes go through a temp-file + rename so a
//! reader never observes a half-written file.

use std::fs;
use std::path::Path;

use loom_core::errors::LoomResult;
use loom_core::models::CoordinationState;

/// Load the state file, migrating an older schema forward. A missing or
/// corrupt file yields fresh defaults instead of erroring — coordination
/// state is best-effort (§4.1).
pub fn read(path: &Path) -> CoordinationState {
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<CoordinationState>(&raw) {
            Ok(state) => state.migrate(),
            Err(e) => {
                tracing::warn!(?path, error = %e, "coordination state file is corrupt, starting fresh");
                CoordinationState::default()
            }
        },
        Err(_) => CoordinationState::default(),
    }
}

/// Write the state file atomically: serialize to a sibling temp file, then
/// rename over the target. The caller must hold the sidecar lock.
pub fn write(path: &Path, state: &CoordinationState) -> LoomResult<()> {
    let json = serde_json::to_string_pretty(state)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, json).map_err(|e| io_err(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

fn io_err(path: &Path, e: std::io::Error) -> loom_core::errors::LoomError {
    loom_core::errors::LoomError::Coordination(loom_core::errors::CoordinationError::CorruptState {
        details: format!("{}: {e}", path.display()),
    })
}
