use crate::domain::{errors::DomainError, ExtractedDocument};
use async_trait::async_trait;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts the page texts of one uploaded document.
    async fn extract(&self, name: &str, data: &[u8]) -> Result<ExtractedDocument, DomainError>;
}
