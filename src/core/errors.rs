use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Crate-wide error type for the ingestion and retrieval pipeline.
///
/// Every user-visible failure carries a stable machine-readable kind
/// (see [`RagError::kind`]) plus a human-readable detail string.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("document produced no chunks")]
    EmptyDocument,
    #[error("embedding service unavailable: {0}")]
    EmbeddingUnavailable(String),
    #[error("generation service unavailable: {0}")]
    GenerationUnavailable(String),
    #[error("corrupt record at {key}: {reason}")]
    CorruptRecord { key: String, reason: String },
    #[error("no documents have been ingested for the requested sessions")]
    NoContextAvailable,
    #[error("store error: {0}")]
    Store(String),
    #[error("{phase} timed out after {seconds}s")]
    Timeout { phase: &'static str, seconds: u64 },
}

impl RagError {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        RagError::InvalidInput(msg.into())
    }

    pub fn store<E: std::fmt::Display>(err: E) -> Self {
        RagError::Store(err.to_string())
    }

    /// Stable error code for logging and API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            RagError::InvalidInput(_) => "INVALID_INPUT",
            RagError::EmptyDocument => "EMPTY_DOCUMENT",
            RagError::EmbeddingUnavailable(_) => "EMBEDDING_UNAVAILABLE",
            RagError::GenerationUnavailable(_) => "GENERATION_UNAVAILABLE",
            RagError::CorruptRecord { .. } => "CORRUPT_RECORD",
            RagError::NoContextAvailable => "NO_CONTEXT_AVAILABLE",
            RagError::Store(_) => "STORE_ERROR",
            RagError::Timeout { .. } => "TIMEOUT",
        }
    }
}

impl IntoResponse for RagError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            RagError::InvalidInput(_) | RagError::EmptyDocument => StatusCode::BAD_REQUEST,
            RagError::NoContextAvailable => StatusCode::NOT_FOUND,
            RagError::EmbeddingUnavailable(_) | RagError::GenerationUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            RagError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            RagError::CorruptRecord { .. } | RagError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string(), "kind": self.kind() }));
        (status, body).into_response()
    }
}
