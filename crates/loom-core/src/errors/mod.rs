mod chain_error;
mod coordination_error;
mod derivation_error;
mod storage_error;

pub use chain_error::ChainError;
pub use coordination_error::CoordinationError;
pub use derivation_error::DerivationError;
pub use storage_error::StorageError;

/// The unified error type returned across the Loom workspace.
///
/// Store-side handlers translate this into the `{ok:false, error:{code,
/// message}}` envelope described in §6/§7; client-side callers match on
/// the non-retryable variants ([`LoomError::Derivation`],
/// [`LoomError::Unauthorized`]) and otherwise feed failures into the
/// coordination store's circuit breaker.
#[derive(Debug, thiserror::Error)]
pub enum LoomError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Coordination(#[from] CoordinationError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entry {id} not found")]
    NotFound { id: String },

    #[error("entry type is immutable: cannot change {id} from {from} to {to}")]
    ImmutableEntryType { id: String, from: String, to: String },

    #[error("entry {id} belongs to a trusted-memory owner: non-chain updates are rejected")]
    TrustedMemoryImmutable { id: String },

    #[error("missing or invalid credentials")]
    Unauthorized,

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("transient network failure: {0}")]
    Network(String),

    #[error("relationship {source}->{target} of type {relationship_type} already exists")]
    DuplicateRelationship {
        source: String,
        target: String,
        relationship_type: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type LoomResult<T> = std::result::Result<T, LoomError>;
