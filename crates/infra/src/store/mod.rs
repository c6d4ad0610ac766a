//! Catalog store: trait + in-memory and Postgres implementations.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

use async_trait::async_trait;
use thiserror::Error;

use storefront_catalog::{LeanProduct, NewProduct, Product, ProductUpdate};
use storefront_core::ProductId;

/// Catalog store operation error.
///
/// These are **infrastructure errors** (connectivity, query execution,
/// decoding) as opposed to domain errors (validation, missing records).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage query failed: {0}")]
    Query(String),

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

/// Durable source of truth for product records.
///
/// Each write is atomic per record; nothing here spans the snapshot cache or
/// the image host. List operations (except `sample_random`) must return
/// records in a stable order so snapshots derived from them are
/// reproducible.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist a new record. The store assigns the identifier and both
    /// timestamps.
    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Apply the set fields of `update` to an existing record, refreshing
    /// `updated_at`. Returns `None` when the id is unknown.
    async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError>;

    /// Remove a record; returns whether one existed.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;

    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Lean projections of all currently-featured products.
    async fn list_featured(&self) -> Result<Vec<LeanProduct>, StoreError>;

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError>;

    /// Up to `count` lean projections drawn at random. Draws are independent
    /// per call; no ordering guarantee.
    async fn sample_random(&self, count: usize) -> Result<Vec<LeanProduct>, StoreError>;
}
