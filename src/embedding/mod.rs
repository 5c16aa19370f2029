//! Embedding collaborator boundary.
//!
//! The pipeline never runs a model in-process; it talks to an
//! OpenAI-compatible embeddings endpoint through the [`Embedder`] trait.

use async_trait::async_trait;

use crate::core::errors::RagError;

mod http;

pub use http::HttpEmbedder;

/// Turns text into fixed-dimension vectors.
///
/// Implementations are expected to be deterministic and dimension-stable
/// for a given configuration.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a single query string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let mut vectors = self.embed_many(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| RagError::EmbeddingUnavailable("empty embedding response".to_string()))
    }

    /// Embeds a batch of chunks in one collaborator call.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;
}
