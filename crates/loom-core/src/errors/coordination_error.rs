/// Coordination-store (C1) errors. Per §4.1 and §5, none of these should
/// ever propagate into a hook's hot path — callers treat them as "use
/// defaults" or "skip the side effect".
#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    #[error("could not acquire coordination lock within {waited_ms}ms")]
    LockTimeout { waited_ms: u64 },

    #[error("coordination state file is corrupt: {details}")]
    CorruptState { details: String },

    #[error("write denied: {reason}")]
    WriteDenied { reason: String },

    #[error("injection denied: {reason}")]
    InjectionDenied { reason: String },
}
