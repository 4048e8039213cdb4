//! API routes for the document Q&A server

pub mod conversation;
pub mod query;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Ingestion - with larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Question answering
        .route("/query", post(query::query_documents))
        // Conversation history
        .route("/conversation/:id", get(conversation::get_conversation))
}
