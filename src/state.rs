use std::sync::Arc;

use crate::core::config::Settings;
use crate::embedding::{Embedder, HttpEmbedder};
use crate::llm::{Generator, HttpGenerator};
use crate::rag::{AnswerComposer, IngestPipeline, RetrievalEngine};
use crate::store::{KeyValueStore, RedisKvStore};

/// Shared application state: the assembled pipeline components.
///
/// Collaborators and the store handle are injected at construction, so
/// tests can wire in doubles without process-wide globals.
pub struct AppState {
    pub settings: Settings,
    pub ingest: IngestPipeline,
    pub retrieval: RetrievalEngine,
    pub composer: AnswerComposer,
}

impl AppState {
    /// Assembles the pipeline from injected dependencies.
    pub fn new(
        settings: Settings,
        store: Arc<dyn KeyValueStore>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let ingest = IngestPipeline::new(
            store.clone(),
            embedder.clone(),
            settings.chunk_size,
            settings.chunk_overlap,
            settings.ttl(),
            settings.request_timeout(),
            settings.embedding_dimension,
        );
        let retrieval = RetrievalEngine::new(
            store,
            embedder,
            settings.top_k,
            settings.max_top_k,
            settings.request_timeout(),
        );
        let composer = AnswerComposer::new(generator);

        Self {
            settings,
            ingest,
            retrieval,
            composer,
        }
    }

    /// Wires the production backends: Redis plus the HTTP collaborators.
    pub async fn initialize(settings: Settings) -> anyhow::Result<Arc<Self>> {
        let store = RedisKvStore::connect(&settings.redis_url()).await?;
        let embedder = HttpEmbedder::new(
            &settings.embedding_url,
            &settings.embedding_model,
            settings.request_timeout(),
        )?;
        let generator = HttpGenerator::new(
            &settings.generation_url,
            &settings.generation_model,
            settings.generation_api_key.clone(),
            settings.max_new_tokens,
            settings.request_timeout(),
        )?;

        Ok(Arc::new(Self::new(
            settings,
            Arc::new(store),
            Arc::new(embedder),
            Arc::new(generator),
        )))
    }
}
