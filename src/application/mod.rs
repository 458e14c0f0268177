//! Application layer - Use cases and orchestration.
//!
//! Services here orchestrate domain logic through the domain ports (traits)
//! rather than concrete adapters, so providers can be swapped without
//! touching the pipeline sequencing.

pub mod services;
pub mod sessions;

pub use services::{Answer, ConversationEngine, IngestOutcome, IngestService, UploadedFile};
pub use sessions::{ChatSession, SessionStore};
