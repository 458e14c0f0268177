//! Chat with uploaded PDF documents.
//!
//! The pipeline: extract page text from uploaded PDFs, split it into
//! overlapping character chunks, embed the chunks into a session-scoped
//! vector store, and answer questions through a retrieval-augmented
//! conversation engine with running memory.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
