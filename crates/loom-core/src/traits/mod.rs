pub mod embedding;
pub mod extractor;

pub use embedding::EmbeddingProvider;
pub use extractor::MemoryExtractor;
