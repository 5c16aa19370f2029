//! End-to-end pipeline tests over the in-memory store with
//! deterministic collaborator doubles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use aurora_rag::core::errors::RagError;
use aurora_rag::embedding::Embedder;
use aurora_rag::llm::Generator;
use aurora_rag::rag::{AnswerComposer, IngestPipeline, RetrievalEngine};
use aurora_rag::store::{encode_vector, MemoryKvStore, KeyValueStore};

const VOCAB: [&str; 8] = ["cat", "sat", "mat", "dog", "ran", "park", "sky", "blue"];

/// Deterministic bag-of-keywords embedding: one dimension per vocabulary
/// term, counting occurrences. Identical text always maps to an
/// identical vector.
fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    VOCAB
        .iter()
        .map(|term| words.iter().filter(|w| **w == *term).count() as f32)
        .collect()
}

struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|t| keyword_vector(t)).collect())
    }
}

struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed_many(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Err(RagError::EmbeddingUnavailable("model offline".to_string()))
    }
}

struct CannedGenerator;

#[async_trait]
impl Generator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, RagError> {
        Ok("The cat sat on the mat.".to_string())
    }
}

const TIMEOUT: Duration = Duration::from_secs(5);

fn ingest_pipeline(store: &Arc<dyn KeyValueStore>, ttl: Duration) -> IngestPipeline {
    IngestPipeline::new(store.clone(), Arc::new(KeywordEmbedder), 20, 5, ttl, TIMEOUT, 0)
}

fn retrieval_engine(store: &Arc<dyn KeyValueStore>) -> RetrievalEngine {
    RetrievalEngine::new(store.clone(), Arc::new(KeywordEmbedder), 3, 20, TIMEOUT)
}

fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryKvStore::new())
}

const DOCUMENT: &str = "The cat sat on the mat. The dog ran in the park.";

#[tokio::test]
async fn ingest_writes_paired_records_per_chunk() {
    let store = memory_store();
    let pipeline = ingest_pipeline(&store, Duration::from_secs(60));

    let batch = pipeline.ingest(DOCUMENT, "s1").await.unwrap();
    assert!(batch.as_str().starts_with("s1:"));

    let keys = store.list_keys("s1:").await.unwrap();
    let vector_count = keys.iter().filter(|k| !k.contains(":text:")).count();
    let text_count = keys.iter().filter(|k| k.contains(":text:")).count();

    assert!(vector_count >= 2, "size=20/overlap=5 must produce >=2 chunks");
    assert_eq!(vector_count, text_count, "every vector has a paired text");
}

#[tokio::test]
async fn cat_query_retrieves_the_cat_chunk_first() {
    let store = memory_store();
    ingest_pipeline(&store, Duration::from_secs(60))
        .ingest(DOCUMENT, "s1")
        .await
        .unwrap();

    let results = retrieval_engine(&store)
        .retrieve("Where did the cat sit?", &["s1".to_string()], Some(1))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(
        results[0].text.contains("cat"),
        "expected the cat chunk, got: {:?}",
        results[0].text
    );
    assert!(results[0].score > 0.0);
}

#[tokio::test]
async fn verbatim_chunk_query_ranks_first_with_score_near_one() {
    let store = memory_store();
    ingest_pipeline(&store, Duration::from_secs(60))
        .ingest(DOCUMENT, "s1")
        .await
        .unwrap();

    // First chunk of DOCUMENT under size=20/overlap=5.
    let chunk: String = DOCUMENT.chars().take(20).collect();
    let results = retrieval_engine(&store)
        .retrieve(&chunk, &["s1".to_string()], None)
        .await
        .unwrap();

    assert_eq!(results[0].text, chunk);
    assert!(results[0].score > 0.999);
}

#[tokio::test]
async fn retrieval_spans_multiple_sessions() {
    let store = memory_store();
    let pipeline = ingest_pipeline(&store, Duration::from_secs(60));
    pipeline.ingest("The cat sat quietly.", "s1").await.unwrap();
    pipeline.ingest("The dog ran far away.", "s2").await.unwrap();

    let results = retrieval_engine(&store)
        .retrieve("dog", &["s1".to_string(), "s2".to_string()], Some(2))
        .await
        .unwrap();

    assert!(results[0].text.contains("dog"));
}

#[tokio::test]
async fn unknown_session_fails_with_no_context() {
    let store = memory_store();
    let err = retrieval_engine(&store)
        .retrieve("anything", &["never-ingested".to_string()], None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "NO_CONTEXT_AVAILABLE");
}

#[tokio::test]
async fn expired_records_behave_like_never_ingested() {
    let store = memory_store();
    ingest_pipeline(&store, Duration::from_millis(10))
        .ingest(DOCUMENT, "s1")
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = retrieval_engine(&store)
        .retrieve("cat", &["s1".to_string()], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "NO_CONTEXT_AVAILABLE");
}

#[tokio::test]
async fn corrupt_vector_records_are_skipped_not_fatal() {
    let store = memory_store();
    ingest_pipeline(&store, Duration::from_secs(60))
        .ingest("The cat sat down.", "s1")
        .await
        .unwrap();

    // A record that would have been an eval() payload upstream.
    store
        .put("s1:deadbeef:0", "__import__('os')", Duration::from_secs(60))
        .await
        .unwrap();

    let results = retrieval_engine(&store)
        .retrieve("cat", &["s1".to_string()], Some(10))
        .await
        .unwrap();

    assert!(results.iter().all(|r| r.text.contains("cat")));
}

#[tokio::test]
async fn missing_text_record_falls_back_to_placeholder() {
    let store = memory_store();
    store
        .put(
            "s9:batch:2",
            &encode_vector(&keyword_vector("cat")),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

    let results = retrieval_engine(&store)
        .retrieve("cat", &["s9".to_string()], Some(1))
        .await
        .unwrap();

    assert_eq!(results[0].text, "Doc s9 chunk 2");
    assert!(results[0].score > 0.999);
}

#[tokio::test]
async fn equal_scores_keep_scan_order() {
    let store = memory_store();
    let ttl = Duration::from_secs(60);
    let vector = encode_vector(&keyword_vector("cat"));

    store.put("s2:aaa:0", &vector, ttl).await.unwrap();
    store.put("s2:aaa:text:0", "first by key order", ttl).await.unwrap();
    store.put("s2:bbb:0", &vector, ttl).await.unwrap();
    store.put("s2:bbb:text:0", "second by key order", ttl).await.unwrap();

    let results = retrieval_engine(&store)
        .retrieve("cat", &["s2".to_string()], Some(2))
        .await
        .unwrap();

    assert_eq!(results[0].text, "first by key order");
    assert_eq!(results[1].text, "second by key order");
}

#[tokio::test]
async fn embedding_failure_aborts_ingestion_with_nothing_persisted() {
    let store = memory_store();
    let pipeline = IngestPipeline::new(
        store.clone(),
        Arc::new(FailingEmbedder),
        20,
        5,
        Duration::from_secs(60),
        TIMEOUT,
        0,
    );

    let err = pipeline.ingest(DOCUMENT, "s1").await.unwrap_err();
    assert_eq!(err.kind(), "EMBEDDING_UNAVAILABLE");
    assert!(store.list_keys("s1:").await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_inputs_are_rejected() {
    let store = memory_store();

    let err = ingest_pipeline(&store, Duration::from_secs(60))
        .ingest("   \n", "s1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "INVALID_INPUT");

    let engine = retrieval_engine(&store);
    let err = engine
        .retrieve("  ", &["s1".to_string()], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "INVALID_INPUT");

    let err = engine.retrieve("query", &[], None).await.unwrap_err();
    assert_eq!(err.kind(), "INVALID_INPUT");
}

#[tokio::test]
async fn ingest_retrieve_compose_end_to_end() {
    let store = memory_store();
    ingest_pipeline(&store, Duration::from_secs(60))
        .ingest(DOCUMENT, "s1")
        .await
        .unwrap();

    let chunks = retrieval_engine(&store)
        .retrieve("Where did the cat sit?", &["s1".to_string()], None)
        .await
        .unwrap();
    assert!(!chunks.is_empty());

    let composer = AnswerComposer::new(Arc::new(CannedGenerator));
    let answer = composer
        .compose("Where did the cat sit?", chunks)
        .await
        .unwrap();

    assert_eq!(answer.response, "The cat sat on the mat.");
    assert!(!answer.context_docs.is_empty());
}
