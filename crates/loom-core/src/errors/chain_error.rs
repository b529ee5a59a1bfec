/// Errors raised by the memory hash chain (C9).
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("chain broken at sequence {at_sequence}: expected prev-hash {expected}, found {actual}")]
    Broken {
        at_sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("owner {owner} has no chain head; cannot append")]
    MissingHead { owner: String },
}
