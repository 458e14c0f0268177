mod embedding;
mod llm;
mod text_extractor;
mod vector_store;

pub use embedding::EmbeddingService;
pub use llm::LlmService;
pub use text_extractor::TextExtractor;
pub use vector_store::VectorStore;
