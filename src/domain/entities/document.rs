use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded document. The binary content is consumed during ingestion
/// and never persisted; only the descriptive record survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    pub page_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content_type: "application/pdf".to_string(),
            page_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = page_count;
        self
    }
}

/// Text extracted from one document, page by page, in page order.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub document: Document,
    pub pages: Vec<String>,
}

impl ExtractedDocument {
    pub fn new(document: Document, pages: Vec<String>) -> Self {
        Self { document, pages }
    }

    /// Concatenated text of all pages.
    pub fn full_text(&self) -> String {
        self.pages.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// One chunk of the concatenated upload text. `batch_id` identifies the
/// ingestion batch the chunk came from, not a single document: chunking
/// runs over the whole upload set, so a chunk can span document boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub content: String,
    pub chunk_index: usize,
}

impl DocumentChunk {
    pub fn new(batch_id: Uuid, content: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            batch_id,
            content: content.into(),
            chunk_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}
