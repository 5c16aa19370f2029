//! The embedding-storage-and-retrieval pipeline.
//!
//! Write path: text -> [`chunker`] -> embedding collaborator ->
//! [`IngestPipeline`] -> key-value store. Read path: query + session ids
//! -> [`RetrievalEngine`] -> ranked chunks -> [`AnswerComposer`].

pub mod chunker;
mod composer;
mod ingest;
mod retrieval;

pub use composer::{AnswerComposer, ComposedAnswer, NO_CONTEXT_SENTINEL};
pub use ingest::IngestPipeline;
pub use retrieval::{RetrievalEngine, RetrievedChunk};
