//! docchat: Document Q&A server
//!
//! Ingests uploaded documents (PDF, Office formats, CSV, plain text)
//! into an in-memory vector index, answers questions over them with
//! source-aware prompt templates, and persists every upload and Q&A
//! exchange as a conversation thread.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    conversation::{Conversation, Message},
    document::{Chunk, FileFormat},
    query::QueryRequest,
    response::{QueryResponse, UploadResponse},
};
