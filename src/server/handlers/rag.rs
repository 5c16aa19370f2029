use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::RagError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RagRequest {
    pub query: String,
    pub session_ids: Vec<String>,
    /// Optional override for the number of chunks to retrieve; clamped
    /// to the configured maximum.
    pub k: Option<usize>,
}

/// `POST /rag-service/rag` — answer a query from session context.
pub async fn rag(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RagRequest>,
) -> Result<impl IntoResponse, RagError> {
    let chunks = state
        .retrieval
        .retrieve(&payload.query, &payload.session_ids, payload.k)
        .await?;
    let answer = state.composer.compose(&payload.query, chunks).await?;

    Ok(Json(json!({
        "response": answer.response,
        "context_docs": answer.context_docs,
    })))
}
