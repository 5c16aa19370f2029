//! Key namespace shared by the ingestion and retrieval paths.
//!
//! Layout, fixed for interoperability with existing stores:
//!
//! ```text
//! vector key: <session_id>:<uuid>:<index>
//! text key:   <session_id>:<uuid>:text:<index>
//! ```
//!
//! The `:text:` infix is the only discriminator between the two key
//! families; a prefix scan for a session returns both and the caller
//! filters with [`is_vector_key`].

use uuid::Uuid;

const TEXT_INFIX: &str = "text";

/// Opaque batch identifier of the form `<session_id>:<uuid>`.
///
/// Minted once per ingestion and used only for key namespacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchId(String);

impl BatchId {
    pub fn mint(session_id: &str) -> Self {
        BatchId(format!("{}:{}", session_id, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key for the embedding record of chunk `index` in a batch.
pub fn vector_key(batch: &BatchId, index: usize) -> String {
    format!("{}:{}", batch.as_str(), index)
}

/// Key for the text record paired with chunk `index` in a batch.
pub fn text_key(batch: &BatchId, index: usize) -> String {
    format!("{}:{}:{}", batch.as_str(), TEXT_INFIX, index)
}

/// Prefix matching every key owned by a session.
pub fn session_prefix(session_id: &str) -> String {
    format!("{}:", session_id)
}

/// True for keys in the vector family: the last segment is a numeric
/// chunk index and is not preceded by the text infix.
pub fn is_vector_key(key: &str) -> bool {
    let mut segments = key.rsplit(':');
    let index_ok = segments
        .next()
        .is_some_and(|last| !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()));
    index_ok && segments.next() != Some(TEXT_INFIX)
}

/// Chunk index carried by a vector-family key.
pub fn chunk_index(vector_key: &str) -> Option<usize> {
    vector_key.rsplit(':').next()?.parse().ok()
}

/// Text-family key paired with a vector-family key.
pub fn text_key_for(vector_key: &str) -> Option<String> {
    let (prefix, index) = vector_key.rsplit_once(':')?;
    Some(format!("{}:{}:{}", prefix, TEXT_INFIX, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_id_is_session_scoped() {
        let batch = BatchId::mint("s1");
        assert!(batch.as_str().starts_with("s1:"));

        let other = BatchId::mint("s1");
        assert_ne!(batch, other);
    }

    #[test]
    fn key_families_are_distinguishable() {
        let batch = BatchId::mint("s1");
        let vkey = vector_key(&batch, 4);
        let tkey = text_key(&batch, 4);

        assert!(is_vector_key(&vkey));
        assert!(!is_vector_key(&tkey));
        assert_eq!(text_key_for(&vkey), Some(tkey));
        assert_eq!(chunk_index(&vkey), Some(4));
    }

    #[test]
    fn both_families_share_the_session_prefix() {
        let batch = BatchId::mint("s1");
        let prefix = session_prefix("s1");
        assert!(vector_key(&batch, 0).starts_with(&prefix));
        assert!(text_key(&batch, 0).starts_with(&prefix));
    }

    #[test]
    fn non_index_suffixes_are_not_vector_keys() {
        assert!(!is_vector_key("s1:batch:text:0"));
        assert!(!is_vector_key("s1:batch:meta"));
        assert!(!is_vector_key("s1:batch:"));
    }
}
