mod conversation;
mod ingest;

pub use conversation::{Answer, ConversationEngine};
pub use ingest::{IngestOutcome, IngestService, UploadedFile};
