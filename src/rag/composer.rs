use std::sync::Arc;

use crate::core::errors::RagError;
use crate::llm::Generator;
use crate::rag::retrieval::RetrievedChunk;

/// Stands in for the context block when nothing usable was retrieved, so
/// the generator never receives an empty context.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant content available.";

/// Final answer with the chunks that supported it, in ranked order.
#[derive(Debug, Clone)]
pub struct ComposedAnswer {
    pub response: String,
    pub context_docs: Vec<String>,
}

/// Builds a prompt from retrieved chunks and delegates to the generation
/// collaborator.
pub struct AnswerComposer {
    generator: Arc<dyn Generator>,
}

impl AnswerComposer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub async fn compose(
        &self,
        query: &str,
        chunks: Vec<RetrievedChunk>,
    ) -> Result<ComposedAnswer, RagError> {
        let context_docs: Vec<String> = chunks.into_iter().map(|chunk| chunk.text).collect();

        let joined = context_docs
            .iter()
            .filter(|text| !text.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        let context = if joined.is_empty() {
            NO_CONTEXT_SENTINEL
        } else {
            joined.as_str()
        };

        let prompt = format!("{}\n\nQuery: {}", context, query);
        let response = self.generator.generate(&prompt).await?;

        Ok(ComposedAnswer {
            response,
            context_docs,
        })
    }
}
