use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::RagError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
    pub session_id: String,
}

/// `POST /embedder/embed` — ingest a document into a session namespace.
pub async fn embed(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmbedRequest>,
) -> Result<impl IntoResponse, RagError> {
    let batch = state
        .ingest
        .ingest(&payload.text, &payload.session_id)
        .await?;
    Ok(Json(json!({ "vector_id": batch.as_str() })))
}
