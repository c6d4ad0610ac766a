//! Image hosting: remote client trait, asset-id derivation, and the
//! two-phase upload/delete lifecycle.

mod http;
mod in_memory;
mod lifecycle;

pub use http::HttpImageHost;
pub use in_memory::InMemoryImageHost;
pub use lifecycle::{ImageLifecycle, ImagePlan};

use async_trait::async_trait;
use thiserror::Error;

/// Logical folder holding every catalog asset on the hosting service.
pub const IMAGE_FOLDER: &str = "products";

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("image upload failed: {0}")]
    Upload(String),

    #[error("image delete failed: {0}")]
    Delete(String),
}

/// Remote image-hosting service.
///
/// Stateless façade: no local bookkeeping, every call costs network/quota on
/// the remote side. Deletes are idempotent — removing an unknown identifier
/// is success.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload a raw image payload into `folder`; returns the hosted locator.
    async fn upload(&self, payload: &str, folder: &str) -> Result<String, ImageHostError>;

    /// Delete the asset addressed by a derived identifier.
    async fn delete(&self, asset_id: &str) -> Result<(), ImageHostError>;
}

/// Derive the deletable asset identifier from a locator.
///
/// Purely syntactic: final path segment, extension stripped, prefixed with
/// the storage folder. A locator that does not follow the upload convention
/// derives a wrong identifier and the delete silently misses; callers never
/// verify the result against the hosting service.
pub fn asset_id_from_locator(locator: &str, folder: &str) -> String {
    let segment = locator.rsplit('/').next().unwrap_or(locator);
    let stem = segment.split('.').next().unwrap_or(segment);
    format!("{folder}/{stem}")
}
