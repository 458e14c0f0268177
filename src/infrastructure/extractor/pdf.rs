use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ports::TextExtractor, Document, DomainError, ExtractedDocument};

/// PDF text extraction: page-wise via lopdf, with a whole-document
/// pdf-extract pass as fallback when page-wise extraction yields nothing.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(data: &[u8]) -> Result<Vec<String>, DomainError> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| DomainError::extraction(format!("failed to load PDF: {e}")))?;

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            // A page that fails to decode becomes an empty page rather than
            // failing the whole document.
            let text = doc.extract_text(&[*page_number]).unwrap_or_default();
            pages.push(normalize(&text));
        }

        if pages.is_empty() {
            return Err(DomainError::extraction("PDF contains no pages"));
        }

        Ok(pages)
    }

    fn extract_whole(data: &[u8]) -> Result<String, DomainError> {
        pdf_extract::extract_text_from_mem(data)
            .map(|text| normalize(&text))
            .map_err(|e| DomainError::extraction(format!("failed to extract text: {e}")))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, name: &str, data: &[u8]) -> Result<ExtractedDocument, DomainError> {
        let pages = match Self::extract_pages(data) {
            Ok(pages) if pages.iter().any(|p| !p.is_empty()) => pages,
            page_wise => {
                debug!(name, "page-wise extraction empty, trying whole-document pass");
                match Self::extract_whole(data) {
                    Ok(text) if !text.is_empty() => vec![text],
                    _ => page_wise?,
                }
            }
        };

        let document = Document::new(name).with_page_count(pages.len());
        Ok(ExtractedDocument::new(document, pages))
    }
}

/// Strips null characters and collapses blank lines left behind by PDF
/// text extraction.
fn normalize(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
