use std::sync::Arc;

use sqlx::PgPool;

use storefront_infra::cache::{
    FEATURED_SNAPSHOT_KEY, NoopSnapshotCache, RedisSnapshotCache, SnapshotCache,
};
use storefront_infra::images::{HttpImageHost, ImageHost, InMemoryImageHost};
use storefront_infra::orchestrator::CatalogOrchestrator;
use storefront_infra::store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore};

/// Application services shared across handlers.
pub struct AppServices {
    pub catalog: CatalogOrchestrator,
}

/// Wire the orchestrator from the environment.
///
/// Each capability is selected exactly once at startup. The snapshot cache
/// degrades to a no-op implementation when absent or failing — never a
/// crash, never an ad-hoc null check at call sites.
pub async fn build_services() -> AppServices {
    let store = build_store().await;
    let host = build_image_host();
    let cache = build_snapshot_cache();

    AppServices {
        catalog: CatalogOrchestrator::new(store, host, cache),
    }
}

async fn build_store() -> Arc<dyn CatalogStore> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPool::connect(&url)
                .await
                .expect("failed to connect to Postgres");
            let store = PostgresCatalogStore::new(pool);
            store
                .ensure_schema()
                .await
                .expect("failed to ensure products schema");
            tracing::info!("catalog store: postgres");
            Arc::new(store)
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set; using in-memory catalog store");
            Arc::new(InMemoryCatalogStore::new())
        }
    }
}

fn build_image_host() -> Arc<dyn ImageHost> {
    match HttpImageHost::from_env() {
        Some(Ok(host)) => {
            tracing::info!("image host: remote HTTP service");
            Arc::new(host)
        }
        Some(Err(err)) => {
            tracing::warn!("image host client failed to initialize, using in-memory host: {err}");
            Arc::new(InMemoryImageHost::new())
        }
        None => {
            tracing::info!("IMAGE_HOST_URL not set; using in-memory image host");
            Arc::new(InMemoryImageHost::new())
        }
    }
}

fn build_snapshot_cache() -> Arc<dyn SnapshotCache> {
    match std::env::var("REDIS_URL") {
        Ok(url) => match RedisSnapshotCache::new(&url, FEATURED_SNAPSHOT_KEY) {
            Ok(cache) => {
                tracing::info!("featured snapshot cache: redis");
                Arc::new(cache)
            }
            Err(err) => {
                tracing::warn!("redis cache failed to initialize, running without cache: {err}");
                Arc::new(NoopSnapshotCache)
            }
        },
        Err(_) => {
            tracing::info!("REDIS_URL not set; running without featured snapshot cache");
            Arc::new(NoopSnapshotCache)
        }
    }
}
