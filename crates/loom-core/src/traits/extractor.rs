use async_trait::async_trait;

use crate::errors::LoomResult;
use crate::models::MemoryCandidate;

/// The memory-extraction worker (LLM-backed) is an external collaborator
/// (§9 "Extractor as external collaborator"). Input is one entry id;
/// output is zero or more candidate memories. The derivation guard (C8)
/// filters the result and the memory chain (C9) serializes the writes.
#[async_trait]
pub trait MemoryExtractor: Send + Sync {
    async fn extract(&self, entry_id: &str) -> LoomResult<Vec<MemoryCandidate>>;
}
