use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use super::{ImageHost, ImageHostError};

/// In-memory image host.
///
/// Intended for tests/dev: uploads return deterministic synthetic locators
/// and every call is recorded. Individual operations can be primed to fail
/// to exercise degraded paths.
#[derive(Debug, Default)]
pub struct InMemoryImageHost {
    uploads: Mutex<Vec<(String, String)>>,
    deletes: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    failing_deletes: Mutex<HashSet<String>>,
    counter: AtomicU64,
}

impl InMemoryImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(payload, locator)` pair uploaded so far.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().expect("lock poisoned").clone()
    }

    /// Every asset identifier a delete was attempted for, including failed
    /// attempts.
    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().expect("lock poisoned").clone()
    }

    /// The locator a payload was uploaded to, if any.
    pub fn locator_of(&self, payload: &str) -> Option<String> {
        self.uploads
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|(p, _)| p == payload)
            .map(|(_, locator)| locator.clone())
    }

    /// Make every subsequent upload fail.
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    /// Make deletes of one specific asset identifier fail.
    pub fn fail_delete(&self, asset_id: impl Into<String>) {
        self.failing_deletes
            .lock()
            .expect("lock poisoned")
            .insert(asset_id.into());
    }
}

#[async_trait]
impl ImageHost for InMemoryImageHost {
    async fn upload(&self, payload: &str, folder: &str) -> Result<String, ImageHostError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ImageHostError::Upload("remote host refused upload".to_string()));
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let locator = format!("https://img.invalid/{folder}/asset-{n}.png");
        self.uploads
            .lock()
            .expect("lock poisoned")
            .push((payload.to_string(), locator.clone()));
        Ok(locator)
    }

    async fn delete(&self, asset_id: &str) -> Result<(), ImageHostError> {
        self.deletes
            .lock()
            .expect("lock poisoned")
            .push(asset_id.to_string());

        let failing = self.failing_deletes.lock().expect("lock poisoned");
        if failing.contains(asset_id) {
            return Err(ImageHostError::Delete("remote host refused delete".to_string()));
        }
        Ok(())
    }
}
