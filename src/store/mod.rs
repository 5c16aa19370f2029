//! TTL-bounded key-value storage for vector and text records.
//!
//! The pipeline only ever talks to the [`KeyValueStore`] trait; the
//! production backend is Redis (`RedisKvStore`), with an in-process
//! implementation (`MemoryKvStore`) for tests and local development.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::errors::RagError;

pub mod keys;
pub mod memory;
pub mod redis;

pub use keys::BatchId;
pub use memory::MemoryKvStore;
pub use redis::RedisKvStore;

/// Expiring key-value backend.
///
/// `get` on an expired key behaves exactly like `get` on a key that was
/// never written; callers must not distinguish the two.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Idempotent overwrite with a fresh TTL.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RagError>;

    /// Returns the live value, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, RagError>;

    /// All live keys starting with `prefix`. Zero matches is an empty
    /// vec, not an error.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, RagError>;
}

/// Encodes an embedding as a JSON array of floats.
///
/// This is the only wire format for stored vectors; it is also readable
/// by the strict parser in [`decode_vector`] and compatible with values
/// written as Python list literals.
pub fn encode_vector(vector: &[f32]) -> String {
    serde_json::to_string(vector).unwrap_or_else(|_| "[]".to_string())
}

/// Strictly parses a stored vector value.
///
/// Anything that is not a well-formed JSON array of finite numbers is a
/// [`RagError::CorruptRecord`]; stored data is never evaluated as code.
pub fn decode_vector(key: &str, raw: &str) -> Result<Vec<f32>, RagError> {
    let vector: Vec<f32> =
        serde_json::from_str(raw).map_err(|err| RagError::CorruptRecord {
            key: key.to_string(),
            reason: err.to_string(),
        })?;

    if vector.iter().any(|v| !v.is_finite()) {
        return Err(RagError::CorruptRecord {
            key: key.to_string(),
            reason: "vector contains non-finite values".to_string(),
        });
    }

    Ok(vector)
}
