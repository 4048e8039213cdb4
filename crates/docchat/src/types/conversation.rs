//! Conversation thread model: an append-only log of upload and Q&A events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event in a conversation. Insertion order is the conversation's
/// chronological order and is preserved exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// A document was uploaded and indexed
    FileUpload {
        file_name: String,
        summary: String,
        timestamp: DateTime<Utc>,
    },
    /// A question was asked and answered
    Qa {
        query: String,
        response: String,
        timestamp: DateTime<Utc>,
    },
}

impl Message {
    /// Timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::FileUpload { timestamp, .. } | Self::Qa { timestamp, .. } => *timestamp,
        }
    }
}

/// Payload for appending a message; the store stamps the timestamp at
/// commit time so message order matches commit order.
#[derive(Debug, Clone)]
pub enum NewMessage {
    FileUpload { file_name: String, summary: String },
    Qa { query: String, response: String },
}

/// A persisted conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Opaque unique identifier (UUID string)
    pub conversation_id: String,
    /// Creation time (first interaction)
    pub created_at: DateTime<Utc>,
    /// Time of the most recent append
    pub updated_at: DateTime<Utc>,
    /// Filenames recorded when the conversation was created
    pub files: Vec<String>,
    /// Chronologically ordered events
    pub messages: Vec<Message>,
}
