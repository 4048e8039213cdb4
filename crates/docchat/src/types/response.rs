//! API response types

use serde::{Deserialize, Serialize};

/// POST /upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// LLM-generated document summary
    pub summary: String,
    /// Conversation the upload was recorded under
    pub conversation_id: String,
    /// Human-readable status line
    pub message: String,
}

/// POST /query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The question as received
    pub query: String,
    /// Synthesized answer
    pub response: String,
    /// Conversation the Q&A was recorded under
    pub conversation_id: String,
}
