mod coordination_config;
mod retrieval_config;
mod sync_config;

pub use coordination_config::CoordinationConfig;
pub use retrieval_config::{FallbackConfig, RetrievalConfig};
pub use sync_config::{ImporterConfig, SyncConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::LoomResult;

/// Top-level configuration, aggregating every component's knobs. Loaded
/// from `~/.loom/config.toml` (or `LOOM_CONFIG` if set) with field-level
/// defaults, so a config file only needs to mention what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoomConfig {
    pub coordination: CoordinationConfig,
    pub retrieval: RetrievalConfig,
    pub fallback: FallbackConfig,
    pub sync: SyncConfig,
    pub importer: ImporterConfig,
    /// Enable the fallback recoverer (C5) when retrieval fails. Default: true.
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl LoomConfig {
    /// Load from `path`, falling back to defaults for any field the file
    /// does not mention. A missing file is not an error: it yields defaults.
    pub fn load(path: &Path) -> LoomResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw)
                .map_err(|e| crate::errors::LoomError::Config(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(crate::errors::LoomError::Config(e.to_string())),
        }
    }

    /// Resolve the default config path under the host's home directory.
    /// Honors `LOOM_CONFIG` first, then `LOOM_HOME`, then `dirs::home_dir`.
    pub fn default_path() -> PathBuf {
        if let Ok(p) = std::env::var("LOOM_CONFIG") {
            return PathBuf::from(p);
        }
        home_dir().join(".loom").join("config.toml")
    }
}

/// Resolve the host's home directory. Every on-disk path the runtime reads
/// (session files, coordination state, lock sidecars) is derived from this
/// single root, per §6's "environment contract". `LOOM_HOME` always wins;
/// otherwise we fall back to the OS-conventional home directory.
pub fn home_dir() -> PathBuf {
    if let Ok(p) = std::env::var("LOOM_HOME") {
        return PathBuf::from(p);
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_internally_consistent() {
        let config = LoomConfig::default();
        assert!(config.fallback_enabled);
        assert_eq!(config.coordination.rate_window_max_writes, 30);
        assert_eq!(config.retrieval.semantic_weight + config.retrieval.keyword_weight, 1.0);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let config = LoomConfig::load(Path::new("/nonexistent/loom-config.toml")).unwrap();
        assert_eq!(config.coordination.max_injections_per_session, 5);
    }
}
