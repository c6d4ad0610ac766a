//! Featured-snapshot cache: one key, replaced wholesale.

mod in_memory;
mod redis;

pub use in_memory::InMemorySnapshotCache;
pub use redis::RedisSnapshotCache;

use async_trait::async_trait;
use thiserror::Error;

/// Cache key holding the serialized featured-products snapshot.
pub const FEATURED_SNAPSHOT_KEY: &str = "featured_products";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Store for one serialized snapshot.
///
/// The snapshot is opaque here; callers serialize and deserialize. `write`
/// replaces the stored value unconditionally, so concurrent writers can
/// produce a stale snapshot but never a partially-updated one. Externally
/// evicted entries simply read as cold.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// The cached snapshot, or `None` when cold.
    async fn read(&self) -> Result<Option<String>, CacheError>;

    /// Replace the stored snapshot wholesale.
    async fn write(&self, snapshot: &str) -> Result<(), CacheError>;
}

/// Cache capability for processes without a configured cache endpoint.
///
/// Reads are always cold and writes are dropped; the catalog stays fully
/// functional with the cache absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSnapshotCache;

#[async_trait]
impl SnapshotCache for NoopSnapshotCache {
    async fn read(&self) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn write(&self, _snapshot: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
