pub mod config;
pub mod embedding;
pub mod extractor;
pub mod llm;
pub mod vector_store;

pub use config::AppConfig;
pub use embedding::TextEmbedding;
pub use extractor::PdfExtractor;
pub use llm::OpenAiLlm;
pub use vector_store::InMemoryVectorStore;
