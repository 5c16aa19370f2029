use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::core::errors::RagError;
use crate::store::KeyValueStore;

/// In-process expiring key-value store.
///
/// Expiry is checked lazily on read, so an expired entry is observably
/// identical to one that was never written.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Entry>>,
}

struct Entry {
    value: String,
    deadline: Instant,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, RagError> {
        self.entries.lock().map_err(|_| RagError::store("memory store poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RagError> {
        let mut entries = self.lock()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RagError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.deadline > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, RagError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.deadline > now);
        Ok(entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
