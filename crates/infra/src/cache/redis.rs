//! Redis-backed snapshot cache.
//!
//! One key, one string value. Intentionally minimal: expiry/eviction policy
//! is left to the Redis deployment, and an evicted key reads as cold.

use async_trait::async_trait;
use redis::AsyncCommands;

use super::{CacheError, SnapshotCache};

/// Redis client holding the featured snapshot under a single key.
#[derive(Debug, Clone)]
pub struct RedisSnapshotCache {
    client: redis::Client,
    key: String,
}

impl RedisSnapshotCache {
    pub fn new(redis_url: impl AsRef<str>, key: impl Into<String>) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            key: key.into(),
        })
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    async fn read(&self) -> Result<Option<String>, CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        let value: Option<String> = conn
            .get(&self.key)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        Ok(value)
    }

    async fn write(&self, snapshot: &str) -> Result<(), CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        let _: () = conn
            .set(&self.key, snapshot)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        Ok(())
    }
}
