//! Sidecar lock file: mere existence denotes a held lock (§6). Acquired by
//! exclusive creation, retried on a poll interval, with stale-lock
//! reclamation so a crashed holder can't wedge the coordination area
//! forever (§4.1, §5).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use loom_core::config::CoordinationConfig;
use loom_core::errors::{CoordinationError, LoomError, LoomResult};

/// An acquired sidecar lock. Dropping it removes the lock file.
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    /// Try to acquire the lock at `path`, retrying on `config`'s poll
    /// interval up to `config.lock_acquire_timeout_secs`. A lock file
    /// older than `config.lock_stale_age_secs` is treated as abandoned
    /// and removed before the next creation attempt.
    pub fn acquire(path: &Path, config: &CoordinationConfig) -> LoomResult<Self> {
        let deadline = Instant::now() + Duration::from_secs(config.lock_acquire_timeout_secs);
        loop {
            match fs::OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(_) => return Ok(Self { path: path.to_path_buf() }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    reclaim_if_stale(path, config.lock_stale_age_secs);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "lock acquire failed with non-contention error");
                    return Err(LoomError::Coordination(CoordinationError::LockTimeout { waited_ms: 0 }));
                }
            }
            if Instant::now() >= deadline {
                return Err(LoomError::Coordination(CoordinationError::LockTimeout {
                    waited_ms: config.lock_acquire_timeout_secs * 1000,
                }));
            }
            thread::sleep(Duration::from_millis(config.lock_poll_interval_ms));
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn reclaim_if_stale(path: &Path, stale_age_secs: u64) {
    let Ok(metadata) = fs::metadata(path) else { return };
    let Ok(modified) = metadata.modified() else { return };
    let age = SystemTime::now().duration_since(modified).unwrap_or(Duration::ZERO);
    if age >= Duration::from_secs(stale_age_secs) {
        tracing::warn!(?path, age_secs = age.as_secs(), "reclaiming stale coordination lock");
        let _ = fs::remove_file(path);
    }
}
