//! Error types for the document Q&A system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docchat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Docchat errors, grouped by how the caller recovers from them:
/// validation errors need different input, `IndexNotReady` needs an
/// upload first, external failures are retryable, storage failures are
/// surfaced on the triggering request only.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No file was attached to the upload request
    #[error("No file provided")]
    FileRequired,

    /// Query was empty or whitespace-only
    #[error("Please provide a question in the text box.")]
    QuestionRequired,

    /// Document produced no indexable text
    #[error("Document '{0}' contains no extractable text")]
    EmptyDocument(String),

    /// File extension outside the allow-list
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Query arrived before any document was ingested
    #[error("Please upload a document first to start asking questions.")]
    IndexNotReady,

    /// Nearest-neighbor search over an index with zero entries
    #[error("Vector index is empty")]
    EmptyIndex,

    /// Text extraction failed
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Embedding provider failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// LLM call failed (generation or summarization)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Synthesizer returned no usable answer
    #[error("No response generated")]
    Synthesis,

    /// Unknown conversation id
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, title) = match &self {
            Error::Config(_) => (StatusCode::BAD_REQUEST, "config_error", None),
            Error::FileRequired => (StatusCode::BAD_REQUEST, "validation", Some("File Required")),
            Error::QuestionRequired => (
                StatusCode::BAD_REQUEST,
                "warning",
                Some("Question Required"),
            ),
            Error::EmptyDocument(_) => (
                StatusCode::BAD_REQUEST,
                "validation",
                Some("Empty Document"),
            ),
            Error::UnsupportedFormat(_) => (
                StatusCode::BAD_REQUEST,
                "validation",
                Some("Unsupported Format"),
            ),
            Error::IndexNotReady => (
                StatusCode::BAD_REQUEST,
                "warning",
                Some("Document Required"),
            ),
            Error::EmptyIndex => (StatusCode::INTERNAL_SERVER_ERROR, "index_error", None),
            Error::Extraction { .. } => (StatusCode::BAD_REQUEST, "extraction_error", None),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error", None),
            Error::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", None),
            Error::Synthesis => (StatusCode::INTERNAL_SERVER_ERROR, "llm_error", None),
            Error::ConversationNotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            Error::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error", None),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None),
        };

        let mut body = json!({
            "error": self.to_string(),
            "type": error_type,
        });
        if let Some(title) = title {
            body["title"] = json!(title);
        }

        (status, Json(body)).into_response()
    }
}
