use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;

use storefront_catalog::{LeanProduct, NewProduct, Product, ProductUpdate};
use storefront_core::ProductId;

use super::{CatalogStore, StoreError};

/// In-memory catalog store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    records: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(records: &HashMap<ProductId, Product>) -> Vec<Product> {
        let mut all: Vec<Product> = records.values().cloned().collect();
        // Stable order: creation time, id as tiebreak.
        all.sort_by_key(|p| (p.created_at, *p.id.as_uuid()));
        all
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError> {
        let product = Product::create(ProductId::new(), new, Utc::now());
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(&id).cloned())
    }

    async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(records.get_mut(&id).map(|product| {
            product.apply_update(update, Utc::now());
            product.clone()
        }))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(records.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(Self::sorted(&records))
    }

    async fn list_featured(&self) -> Result<Vec<LeanProduct>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(Self::sorted(&records)
            .iter()
            .filter(|p| p.is_featured)
            .map(Product::lean)
            .collect())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(Self::sorted(&records)
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    async fn sample_random(&self, count: usize) -> Result<Vec<LeanProduct>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let leans: Vec<LeanProduct> = records.values().map(Product::lean).collect();
        let mut rng = rand::thread_rng();
        Ok(leans.choose_multiple(&mut rng, count).cloned().collect())
    }
}
