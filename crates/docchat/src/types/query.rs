//! Query request types

use serde::{Deserialize, Serialize};

/// POST /query request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The natural-language question
    #[serde(default)]
    pub query: String,
    /// Conversation to append the Q&A to; a fresh one is minted when absent
    #[serde(default)]
    pub conversation_id: Option<String>,
}
