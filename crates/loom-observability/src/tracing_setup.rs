//! `tracing-subscriber` initialization and per-operation span macros, one
//! per C1–C12 component, so every crate in the workspace logs through a
//! consistent span shape (`loom.<component>`).

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber honoring `RUST_LOG` (default
/// `info`). Call once, from the binary's `main`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A coordination-store decision (C1: `canWrite`/`checkInjection`).
#[macro_export]
macro_rules! coordination_span {
    ($agent_key:expr) => {
        tracing::info_span!("loom.coordination", agent_key = %$agent_key)
    };
}

/// An injection-governor decision (C3).
#[macro_export]
macro_rules! governor_span {
    ($session_id:expr) => {
        tracing::info_span!("loom.governor", session_id = %$session_id)
    };
}

/// A smart-retriever search (C4).
#[macro_export]
macro_rules! retriever_span {
    ($query_chars:expr) => {
        tracing::info_span!("loom.retriever", query_chars = $query_chars)
    };
}

/// A fallback-recoverer scan (C5).
#[macro_export]
macro_rules! fallback_span {
    ($sessions_dir:expr) => {
        tracing::info_span!("loom.fallback", sessions_dir = %$sessions_dir)
    };
}

/// A chat-stream sync pass (C6).
#[macro_export]
macro_rules! sync_span {
    ($session_file:expr) => {
        tracing::info_span!("loom.sync", session_file = %$session_file)
    };
}

/// A chat-stream append (C7).
#[macro_export]
macro_rules! append_span {
    ($entry_id:expr) => {
        tracing::info_span!("loom.append", entry_id = %$entry_id)
    };
}

/// A derivation-guard check (C8).
#[macro_export]
macro_rules! derivation_span {
    ($owner_id:expr) => {
        tracing::info_span!("loom.derivation", owner_id = %$owner_id)
    };
}

/// A memory-chain append/verify (C9).
#[macro_export]
macro_rules! chain_span {
    ($owner_id:expr) => {
        tracing::info_span!("loom.chain", owner_id = %$owner_id)
    };
}

/// A session-importer pass (C10).
#[macro_export]
macro_rules! importer_span {
    ($path:expr) => {
        tracing::info_span!("loom.importer", path = %$path)
    };
}

/// A search-facade request (C11).
#[macro_export]
macro_rules! search_span {
    ($search_type:expr) => {
        tracing::info_span!("loom.search", search_type = ?$search_type)
    };
}

/// Span names as constants for programmatic use (log filtering, tests).
pub mod names {
    pub const COORDINATION: &str = "loom.coordination";
    pub const GOVERNOR: &str = "loom.governor";
    pub const RETRIEVER: &str = "loom.retriever";
    pub const FALLBACK: &str = "loom.fallback";
    pub const SYNC: &str = "loom.sync";
    pub const APPEND: &str = "loom.append";
    pub const DERIVATION: &str = "loom.derivation";
    pub const CHAIN: &str = "loom.chain";
    pub const IMPORTER: &str = "loom.importer";
    pub const SEARCH: &str = "loom.search";
}
