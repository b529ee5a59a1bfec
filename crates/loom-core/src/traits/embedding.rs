use crate::errors::LoomResult;

/// Embedding generation provider. Out of scope per §1 (the embedding
/// model is an external collaborator); this trait is the seam the search
/// facade (C11) and smart retriever (C4) code against.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> LoomResult<Vec<f32>>;
    fn dimensions(&self) -> usize;
    fn name(&self) -> &str;
}
