//! Generation collaborator boundary.

use async_trait::async_trait;

use crate::core::errors::RagError;

mod http;

pub use http::HttpGenerator;

/// Opaque, possibly-failing remote text generator.
///
/// Failures are surfaced as [`RagError::GenerationUnavailable`] and never
/// retried here; retry policy belongs to the caller.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, RagError>;
}
