use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::core::errors::RagError;
use crate::embedding::Embedder;
use crate::rag::chunker;
use crate::store::{encode_vector, keys, BatchId, KeyValueStore};

/// Turns raw text into stored (vector, text) record pairs.
///
/// Ingestion is all-or-nothing with respect to the embedding call: a
/// collaborator failure aborts before anything is persisted. Record
/// writes are best-effort per pair; a failure mid-batch is reported to
/// the caller and may leave earlier pairs behind until their TTL fires.
pub struct IngestPipeline {
    store: Arc<dyn KeyValueStore>,
    embedder: Arc<dyn Embedder>,
    chunk_size: usize,
    chunk_overlap: usize,
    ttl: Duration,
    op_timeout: Duration,
    expected_dimension: usize,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        embedder: Arc<dyn Embedder>,
        chunk_size: usize,
        chunk_overlap: usize,
        ttl: Duration,
        op_timeout: Duration,
        expected_dimension: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            chunk_size,
            chunk_overlap,
            ttl,
            op_timeout,
            expected_dimension,
        }
    }

    /// Chunks, embeds, and stores `text` under a fresh batch id scoped to
    /// `session_id`.
    pub async fn ingest(&self, text: &str, session_id: &str) -> Result<BatchId, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::invalid("text cannot be empty"));
        }

        let chunks = chunker::split(text, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            return Err(RagError::EmptyDocument);
        }

        let embeddings = self.embedder.embed_many(&chunks).await?;
        self.check_shape(&chunks, &embeddings)?;

        let batch = BatchId::mint(session_id);
        for (index, (chunk, embedding)) in chunks.iter().zip(embeddings.iter()).enumerate() {
            let vector_value = encode_vector(embedding);
            self.put(&keys::vector_key(&batch, index), &vector_value)
                .await?;
            self.put(&keys::text_key(&batch, index), chunk).await?;
        }

        tracing::info!(
            batch_id = %batch,
            chunks = chunks.len(),
            "ingested document"
        );
        Ok(batch)
    }

    fn check_shape(&self, chunks: &[String], embeddings: &[Vec<f32>]) -> Result<(), RagError> {
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingUnavailable(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let expected = match self.expected_dimension {
            0 => embeddings[0].len(),
            d => d,
        };
        for embedding in embeddings {
            if embedding.is_empty() || embedding.len() != expected {
                return Err(RagError::EmbeddingUnavailable(format!(
                    "embedding dimension mismatch: expected {}, got {}",
                    expected,
                    embedding.len()
                )));
            }
        }
        Ok(())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), RagError> {
        timeout(self.op_timeout, self.store.put(key, value, self.ttl))
            .await
            .map_err(|_| RagError::Timeout {
                phase: "store write",
                seconds: self.op_timeout.as_secs(),
            })?
    }
}
