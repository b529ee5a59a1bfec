/// Loom system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum derivation depth a memory may carry (§8: depth(m) <= 3).
pub const MAX_DERIVATION_DEPTH: u32 = 3;

/// Sliding window length for the per-agent write rate limit.
pub const RATE_WINDOW_SECS: u64 = 60;

/// Writes allowed per agent per rate window.
pub const RATE_WINDOW_MAX_WRITES: u32 = 30;

/// Consecutive failures before the circuit breaker opens.
pub const CIRCUIT_BREAKER_FAILURE_THRESHOLD: u32 = 5;

/// Circuit breaker backoff cap.
pub const CIRCUIT_BREAKER_MAX_BACKOFF_SECS: u64 = 3600;

/// Maximum injections allowed per session, for the lifetime of that session.
pub const MAX_INJECTIONS_PER_SESSION: u32 = 5;

/// Minimum spacing between two injections, regardless of session.
pub const MIN_INJECTION_SPACING_SECS: u64 = 30;

/// A session-file birth instant must move forward by more than this to be
/// treated as "the session file was recreated" rather than clock noise.
pub const SESSION_RECREATION_GRACE_SECS: i64 = 2;

/// Size above which a formatted context block is rejected outright.
pub const MAX_INJECTION_CONTEXT_CHARS: usize = 50_000;

/// Coordination-store lock: poll interval while waiting to acquire.
pub const LOCK_POLL_INTERVAL_MS: u64 = 50;

/// Coordination-store lock: give up waiting after this long.
pub const LOCK_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// A lock file older than this is considered abandoned and reclaimed.
pub const LOCK_STALE_AGE_SECS: u64 = 10;

/// Coordination records older than this are pruned.
pub const COORDINATION_RETENTION_DAYS: i64 = 7;

/// Coordination state tracks at most this many sessions before pruning.
pub const COORDINATION_MAX_SESSIONS: usize = 100;

/// Wall-clock budget for a full injection-governor decision.
pub const GOVERNOR_DECISION_BUDGET_SECS: u64 = 5;

/// Wall-clock budget for a search request issued by the retriever.
pub const SEARCH_REQUEST_BUDGET_SECS: u64 = 8;

/// Wall-clock budget for a chat-stream append request.
pub const APPEND_REQUEST_BUDGET_SECS: u64 = 10;

/// `message_count` must cross a multiple of this before extraction is queued.
pub const EXTRACTION_TRIGGER_INTERVAL: u64 = 10;

/// Debounce window for extraction-job enqueue per entry.
pub const EXTRACTION_DEBOUNCE_SECS: i64 = 30;

/// Sync-state table (per watched file) is capped at this many entries.
pub const SYNC_STATE_MAX_ENTRIES: usize = 50;

/// Cache TTL for resolving the "current main session" pointer file.
pub const SESSION_POINTER_CACHE_TTL_SECS: u64 = 30;
