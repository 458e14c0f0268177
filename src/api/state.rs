use std::sync::Arc;

use crate::application::{IngestService, SessionStore};
use crate::domain::ports::{EmbeddingService, LlmService, TextExtractor};
use crate::domain::TextSplitter;
use crate::infrastructure::{AppConfig, OpenAiLlm, PdfExtractor, TextEmbedding};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub ingest_service: Arc<IngestService>,
    pub embedding: Arc<dyn EmbeddingService>,
    pub llm: Arc<dyn LlmService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let extractor: Arc<dyn TextExtractor> = Arc::new(PdfExtractor::new());
        let embedding: Arc<dyn EmbeddingService> =
            Arc::new(TextEmbedding::from_config(&config.embedding));
        let llm: Arc<dyn LlmService> = Arc::new(OpenAiLlm::new(&config.llm.model));
        Self::with_ports(config, extractor, embedding, llm)
    }

    /// Wires the state from explicit port implementations; tests inject
    /// mocks here.
    pub fn with_ports(
        config: AppConfig,
        extractor: Arc<dyn TextExtractor>,
        embedding: Arc<dyn EmbeddingService>,
        llm: Arc<dyn LlmService>,
    ) -> anyhow::Result<Self> {
        let splitter = TextSplitter::new(
            config.chunking.separator.clone(),
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        )?;
        let ingest_service = Arc::new(IngestService::new(extractor, embedding.clone(), splitter));
        let session_ttl = std::time::Duration::from_secs(config.server.session_ttl_seconds);

        Ok(Self {
            sessions: Arc::new(SessionStore::new(session_ttl)),
            ingest_service,
            embedding,
            llm,
            config: Arc::new(config),
        })
    }
}
