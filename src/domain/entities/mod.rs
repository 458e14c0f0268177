mod conversation;
mod document;
mod embedding;

pub use conversation::{Conversation, Exchange, Message, MessageRole};
pub use document::{Document, DocumentChunk, ExtractedDocument, SearchResult};
pub use embedding::Embedding;
