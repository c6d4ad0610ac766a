use std::sync::RwLock;

use async_trait::async_trait;

use super::{CacheError, SnapshotCache};

/// In-memory snapshot cache.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySnapshotCache {
    slot: RwLock<Option<String>>,
}

impl InMemorySnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the stored snapshot, as an external eviction would.
    pub fn evict(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }
}

#[async_trait]
impl SnapshotCache for InMemorySnapshotCache {
    async fn read(&self) -> Result<Option<String>, CacheError> {
        self.slot
            .read()
            .map(|slot| slot.clone())
            .map_err(|_| CacheError::Operation("lock poisoned".to_string()))
    }

    async fn write(&self, snapshot: &str) -> Result<(), CacheError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| CacheError::Operation("lock poisoned".to_string()))?;
        *slot = Some(snapshot.to_string());
        Ok(())
    }
}
