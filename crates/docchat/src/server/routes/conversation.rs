//! Conversation history endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::Conversation;

/// GET /conversation/:id - fetch a full conversation thread
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>> {
    let conversation = state.conversations().get(&id)?;
    Ok(Json(conversation))
}
