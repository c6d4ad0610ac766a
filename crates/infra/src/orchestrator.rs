//! Catalog mutation pipeline (application-level orchestration).
//!
//! Every catalog mutation touches up to three independently-failing systems:
//! the catalog store (durable source of truth), the image host, and the
//! featured-snapshot cache. No transaction spans them. This module sequences
//! each operation as
//!
//! ```text
//! upload phase  →  catalog store write  →  deletion phase  →  cache rebuild
//! (must succeed)   (must succeed)          (best effort)      (best effort)
//! ```
//!
//! so the worst-case failure is always an orphaned *unused* image, never a
//! committed record pointing at a missing one. Best-effort steps are logged
//! and absorbed: once the store write has succeeded the operation reports
//! success regardless of cleanup or cache outcomes.

use std::sync::Arc;

use thiserror::Error;

use storefront_catalog::{LeanProduct, NewProduct, Product, ProductDraft, ProductPatch, ProductUpdate};
use storefront_core::{DomainError, ProductId};

use crate::cache::SnapshotCache;
use crate::images::{ImageHost, ImageHostError, ImageLifecycle};
use crate::store::{CatalogStore, StoreError};

/// Default sample size for recommendation reads.
pub const DEFAULT_RECOMMENDED_COUNT: usize = 4;

/// Error surfaced to callers of the orchestrator.
///
/// Cache failures and image-delete failures never appear here; they are
/// absorbed per the best-effort contract.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Invalid input; nothing was performed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The addressed product does not exist; nothing was performed.
    #[error("product not found")]
    NotFound,

    /// The catalog store failed; images uploaded earlier in the same
    /// operation are not rolled back.
    #[error("catalog store failure: {0}")]
    Store(String),

    /// An upload failed before the store write; no record was written.
    #[error("image upload failed: {0}")]
    ImageUpload(String),
}

impl From<DomainError> for CatalogError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound => Self::NotFound,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<ImageHostError> for CatalogError {
    fn from(err: ImageHostError) -> Self {
        Self::ImageUpload(err.to_string())
    }
}

/// Sequences catalog-store writes, image lifecycle calls, and snapshot
/// rebuilds for each catalog operation.
pub struct CatalogOrchestrator {
    store: Arc<dyn CatalogStore>,
    images: ImageLifecycle,
    cache: Arc<dyn SnapshotCache>,
}

impl CatalogOrchestrator {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        host: Arc<dyn ImageHost>,
        cache: Arc<dyn SnapshotCache>,
    ) -> Self {
        Self {
            store,
            images: ImageLifecycle::new(host),
            cache,
        }
    }

    /// Create a product: upload phase, then the store write.
    ///
    /// A record is never written without a main image, so a missing payload
    /// is a validation failure and an upload failure aborts the operation.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        draft.validate()?;

        let main_payload = match draft.image.as_deref() {
            Some(payload) if !payload.trim().is_empty() => payload,
            _ => return Err(CatalogError::Validation("image is required".to_string())),
        };
        let additional_payloads = draft.images.as_deref().unwrap_or(&[]);

        let (image, images) = self
            .images
            .stage_create(main_payload, additional_payloads)
            .await?;

        // A store failure here leaves the just-uploaded assets behind as
        // orphans; they are unreferenced and harmless.
        let product = self
            .store
            .insert(NewProduct {
                name: draft.name,
                description: draft.description,
                price: draft.price,
                category: draft.category,
                image,
                images,
            })
            .await?;

        Ok(product)
    }

    /// Update a product: upload phase, store write, then best-effort cleanup
    /// of superseded assets. Rebuilds the snapshot only when the featured
    /// flag actually changed.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        patch.validate()?;

        let current = self.store.get(id).await?.ok_or(CatalogError::NotFound)?;

        let plan = self
            .images
            .stage_update(&current, patch.image.as_deref(), patch.images.as_deref())
            .await?;

        let featured_changed = patch
            .is_featured
            .is_some_and(|flag| flag != current.is_featured);

        let updated = self
            .store
            .update(
                id,
                ProductUpdate {
                    name: patch.name,
                    description: patch.description,
                    price: patch.price,
                    category: patch.category,
                    image: plan.image.clone(),
                    images: plan.images.clone(),
                    is_featured: patch.is_featured,
                },
            )
            .await?
            .ok_or(CatalogError::NotFound)?;

        self.images.discard(&plan.superseded).await;

        if featured_changed {
            self.rebuild_featured_snapshot().await;
        }

        Ok(updated)
    }

    /// Flip the featured flag and rebuild the snapshot unconditionally —
    /// the flag changed by definition.
    pub async fn toggle_featured(&self, id: ProductId) -> Result<Product, CatalogError> {
        let current = self.store.get(id).await?.ok_or(CatalogError::NotFound)?;

        let updated = self
            .store
            .update(
                id,
                ProductUpdate {
                    is_featured: Some(!current.is_featured),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(CatalogError::NotFound)?;

        self.rebuild_featured_snapshot().await;

        Ok(updated)
    }

    /// Delete a product, then its assets, best-effort.
    ///
    /// The snapshot is not rebuilt here: deleting a featured product leaves
    /// it stale until the next featured-flag toggle or explicit rebuild.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let current = self.store.get(id).await?.ok_or(CatalogError::NotFound)?;

        if !self.store.delete(id).await? {
            return Err(CatalogError::NotFound);
        }

        let mut locators = Vec::with_capacity(1 + current.images.len());
        if !current.image.is_empty() {
            locators.push(current.image);
        }
        locators.extend(current.images);
        self.images.discard(&locators).await;

        Ok(())
    }

    pub async fn all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_by_category(category).await?)
    }

    /// Random lean sample for "recommended" views; independent draws each
    /// call.
    pub async fn recommended(&self, count: usize) -> Result<Vec<LeanProduct>, CatalogError> {
        Ok(self.store.sample_random(count).await?)
    }

    /// Featured products, cache-aside.
    ///
    /// A cached snapshot is returned verbatim with no staleness check. A
    /// cold — or failing — cache falls through to the store, and the fresh
    /// result (empty included) is written back best-effort.
    pub async fn featured(&self) -> Result<Vec<LeanProduct>, CatalogError> {
        match self.cache.read().await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(snapshot) => return Ok(snapshot),
                Err(err) => {
                    tracing::warn!("cached featured snapshot is unreadable, falling back to store: {err}");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("featured snapshot read failed, treating cache as cold: {err}");
            }
        }

        let fresh = self.store.list_featured().await?;
        self.write_snapshot(&fresh).await;
        Ok(fresh)
    }

    /// Wholesale snapshot rebuild from the authoritative featured list.
    ///
    /// Best-effort: the triggering mutation has already committed, so store
    /// or cache failures here are logged and absorbed. The stored snapshot
    /// is overwritten unconditionally, regardless of what was cached.
    pub async fn rebuild_featured_snapshot(&self) {
        let fresh = match self.store.list_featured().await {
            Ok(products) => products,
            Err(err) => {
                tracing::warn!("snapshot rebuild skipped, featured list unavailable: {err}");
                return;
            }
        };
        self.write_snapshot(&fresh).await;
    }

    async fn write_snapshot(&self, products: &[LeanProduct]) {
        let raw = match serde_json::to_string(products) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("featured snapshot serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = self.cache.write(&raw).await {
            tracing::warn!("featured snapshot write failed, serving uncached: {err}");
        }
    }
}
