//! Question answering endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{NewMessage, QueryRequest, QueryResponse};

/// POST /query - answer a question from the indexed documents
pub async fn query_documents(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let response = answer_question(&state, request).await?;
    Ok(Json(response))
}

/// Retrieve context, synthesize an answer, and record the exchange.
pub async fn answer_question(state: &AppState, request: QueryRequest) -> Result<QueryResponse> {
    let retrieval = state.retriever().retrieve(&request.query).await?;

    tracing::info!(
        prompt = ?retrieval.prompt_kind,
        hits = retrieval.hits.len(),
        "Answering question"
    );

    let answer = state
        .llm()
        .generate_answer(retrieval.prompt_kind, &retrieval.context, &request.query)
        .await?;
    if answer.trim().is_empty() {
        return Err(crate::error::Error::Synthesis);
    }

    let conversation_id = state.conversations().append(
        request.conversation_id.as_deref(),
        NewMessage::Qa {
            query: request.query.clone(),
            response: answer.clone(),
        },
    )?;

    Ok(QueryResponse {
        query: request.query,
        response: answer,
        conversation_id,
    })
}
