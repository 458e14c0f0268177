use std::sync::Arc;
use tracing::{instrument, warn};

use crate::domain::{
    ports::{EmbeddingService, TextExtractor, VectorStore},
    Document, DocumentChunk, DomainError, TextSplitter,
};

/// One uploaded file, held in memory until ingestion consumes it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug)]
pub struct IngestOutcome {
    pub documents: Vec<Document>,
    pub chunk_count: usize,
}

/// Runs the ingestion pipeline: extract page text from every upload,
/// concatenate, split into overlapping chunks, embed, and index.
pub struct IngestService {
    extractor: Arc<dyn TextExtractor>,
    embedding: Arc<dyn EmbeddingService>,
    splitter: TextSplitter,
}

impl IngestService {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        embedding: Arc<dyn EmbeddingService>,
        splitter: TextSplitter,
    ) -> Self {
        Self {
            extractor,
            embedding,
            splitter,
        }
    }

    /// Builds a knowledge base from the uploaded documents by filling `store`
    /// with (chunk, embedding) pairs. All uploads are processed in order.
    #[instrument(skip(self, files, store), fields(file_count = files.len()))]
    pub async fn build_knowledge_base(
        &self,
        files: &[UploadedFile],
        store: &Arc<dyn VectorStore>,
    ) -> Result<IngestOutcome, DomainError> {
        if files.is_empty() {
            return Err(DomainError::validation("no documents uploaded"));
        }

        let mut documents = Vec::with_capacity(files.len());
        let mut raw_text = String::new();

        for file in files {
            let extracted = self.extractor.extract(&file.name, &file.data).await?;
            if extracted.is_empty() {
                warn!(name = %file.name, "no text extracted from document");
            }
            if !raw_text.is_empty() {
                raw_text.push('\n');
            }
            raw_text.push_str(&extracted.full_text());
            documents.push(extracted.document);
        }

        if raw_text.trim().is_empty() {
            return Err(DomainError::extraction(
                "no text could be extracted from the uploaded documents",
            ));
        }

        let batch_id = uuid::Uuid::new_v4();
        let chunks: Vec<DocumentChunk> = self
            .splitter
            .split(&raw_text)
            .into_iter()
            .enumerate()
            .map(|(index, content)| DocumentChunk::new(batch_id, content, index))
            .collect();

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;

        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            store.upsert(chunk, embedding).await?;
        }

        Ok(IngestOutcome {
            documents,
            chunk_count: chunks.len(),
        })
    }
}
