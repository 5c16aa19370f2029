use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::core::errors::RagError;
use crate::store::KeyValueStore;

/// Redis-backed expiring key-value store.
///
/// Records are written with SETEX so the server owns expiry; there is no
/// explicit delete path anywhere in the pipeline.
#[derive(Clone)]
pub struct RedisKvStore {
    conn: ConnectionManager,
}

impl RedisKvStore {
    /// Connects with an auto-reconnecting connection manager.
    pub async fn connect(url: &str) -> Result<Self, RagError> {
        let client = Client::open(url).map_err(RagError::store)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(RagError::store)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisKvStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RagError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(RagError::store)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RagError> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(RagError::store)
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, RagError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", prefix);
        conn.keys(pattern).await.map_err(RagError::store)
    }
}
