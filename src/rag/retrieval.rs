use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::core::errors::RagError;
use crate::embedding::Embedder;
use crate::store::{decode_vector, keys, KeyValueStore};
use crate::vector_math::cosine_similarity;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub text: String,
    pub score: f32,
}

/// Top-k cosine-similarity retrieval over session-scoped records.
pub struct RetrievalEngine {
    store: Arc<dyn KeyValueStore>,
    embedder: Arc<dyn Embedder>,
    default_k: usize,
    max_k: usize,
    op_timeout: Duration,
}

struct Candidate {
    text: String,
    vector: Vec<f32>,
}

impl RetrievalEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        embedder: Arc<dyn Embedder>,
        default_k: usize,
        max_k: usize,
        op_timeout: Duration,
    ) -> Self {
        Self {
            store,
            embedder,
            default_k,
            max_k,
            op_timeout,
        }
    }

    /// Returns the top-k chunks across `session_ids` ranked by cosine
    /// similarity to `query`, ties broken by scan order.
    ///
    /// Corrupt vector records are skipped with a warning; a missing text
    /// record falls back to a deterministic placeholder. Zero usable
    /// candidates across all sessions is [`RagError::NoContextAvailable`].
    pub async fn retrieve(
        &self,
        query: &str,
        session_ids: &[String],
        k: Option<usize>,
    ) -> Result<Vec<RetrievedChunk>, RagError> {
        if query.trim().is_empty() {
            return Err(RagError::invalid("query cannot be empty"));
        }
        if session_ids.is_empty() {
            return Err(RagError::invalid("at least one session_id is required"));
        }
        let k = k.unwrap_or(self.default_k).clamp(1, self.max_k);

        let mut candidates = Vec::new();
        for session_id in session_ids {
            self.collect_session(session_id, &mut candidates).await?;
        }
        if candidates.is_empty() {
            return Err(RagError::NoContextAvailable);
        }

        let query_vector = self.embedder.embed(query).await?;

        let mut ranked: Vec<RetrievedChunk> = candidates
            .into_iter()
            .map(|candidate| RetrievedChunk {
                score: cosine_similarity(&query_vector, &candidate.vector),
                text: candidate.text,
            })
            .collect();

        // Stable sort keeps scan order for equal scores.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked)
    }

    async fn collect_session(
        &self,
        session_id: &str,
        candidates: &mut Vec<Candidate>,
    ) -> Result<(), RagError> {
        let prefix = keys::session_prefix(session_id);
        let mut vector_keys: Vec<String> = self
            .with_deadline("store scan", self.store.list_keys(&prefix))
            .await?
            .into_iter()
            .filter(|key| keys::is_vector_key(key))
            .collect();
        // Backends return keys in arbitrary order; sort for a
        // deterministic scan.
        vector_keys.sort();

        for key in vector_keys {
            let Some(raw) = self.with_deadline("store read", self.store.get(&key)).await? else {
                // Expired between scan and fetch.
                continue;
            };

            let vector = match decode_vector(&key, &raw) {
                Ok(vector) => vector,
                Err(err) => {
                    tracing::warn!(key = %key, "skipping corrupt vector record: {}", err);
                    continue;
                }
            };

            let text = self.fetch_text(session_id, &key).await?;
            candidates.push(Candidate { text, vector });
        }
        Ok(())
    }

    async fn fetch_text(&self, session_id: &str, vector_key: &str) -> Result<String, RagError> {
        if let Some(text_key) = keys::text_key_for(vector_key) {
            if let Some(text) = self
                .with_deadline("store read", self.store.get(&text_key))
                .await?
            {
                return Ok(text);
            }
        }

        let index = keys::chunk_index(vector_key).unwrap_or(0);
        Ok(format!("Doc {} chunk {}", session_id, index))
    }

    async fn with_deadline<T>(
        &self,
        phase: &'static str,
        fut: impl std::future::Future<Output = Result<T, RagError>>,
    ) -> Result<T, RagError> {
        timeout(self.op_timeout, fut)
            .await
            .map_err(|_| RagError::Timeout {
                phase,
                seconds: self.op_timeout.as_secs(),
            })?
    }
}
