/// Errors raised by the derivation guard (C8).
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    #[error("duplicate memory: content hash {content_hash} already current for owner")]
    DuplicateContent { content_hash: String },

    #[error("derivation depth {depth} exceeds cap of {max}")]
    DepthExceeded { depth: u32, max: u32 },

    #[error("source memory {id} not found")]
    SourceNotFound { id: String },
}
