//! Core domain types

pub mod conversation;
pub mod document;
pub mod query;
pub mod response;

pub use conversation::{Conversation, Message, NewMessage};
pub use document::{Chunk, FileFormat, IndexedVector};
pub use query::QueryRequest;
pub use response::{QueryResponse, UploadResponse};
