use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use storefront_catalog::{LeanProduct, NewProduct, Product, ProductUpdate};
use storefront_core::ProductId;

use super::{CatalogStore, StoreError};

/// Postgres-backed catalog store (one row per product).
///
/// Queries are built at runtime; the schema is created on demand via
/// [`PostgresCatalogStore::ensure_schema`].
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id           UUID PRIMARY KEY,
    name         TEXT NOT NULL,
    description  TEXT NOT NULL,
    price        DOUBLE PRECISION NOT NULL,
    image        TEXT NOT NULL,
    images       TEXT[] NOT NULL DEFAULT '{}',
    category     TEXT NOT NULL,
    is_featured  BOOLEAN NOT NULL DEFAULT FALSE,
    stock        BIGINT NOT NULL,
    colors       TEXT[] NOT NULL,
    sizes        TEXT[] NOT NULL,
    rating       REAL NOT NULL,
    review_count BIGINT NOT NULL,
    brand        TEXT NOT NULL,
    weight       TEXT NOT NULL,
    dimensions   TEXT NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL,
    updated_at   TIMESTAMPTZ NOT NULL
)
"#;

const ALL_COLUMNS: &str = "id, name, description, price, image, images, category, is_featured, \
     stock, colors, sizes, rating, review_count, brand, weight, dimensions, created_at, updated_at";

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the products table when missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}

fn query_err(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

fn corrupt(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

fn row_to_product(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        image: row.try_get("image")?,
        images: row.try_get("images")?,
        category: row.try_get("category")?,
        is_featured: row.try_get("is_featured")?,
        stock: row.try_get::<i64, _>("stock")? as u32,
        colors: row.try_get("colors")?,
        sizes: row.try_get("sizes")?,
        rating: row.try_get("rating")?,
        review_count: row.try_get::<i64, _>("review_count")? as u32,
        brand: row.try_get("brand")?,
        weight: row.try_get("weight")?,
        dimensions: row.try_get("dimensions")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_lean(row: &PgRow) -> Result<LeanProduct, sqlx::Error> {
    Ok(LeanProduct {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        price: row.try_get("price")?,
    })
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError> {
        let product = Product::create(ProductId::new(), new, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price, image, images, category, is_featured,
                stock, colors, sizes, rating, review_count, brand, weight, dimensions,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(Uuid::from(product.id))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image)
        .bind(&product.images)
        .bind(&product.category)
        .bind(product.is_featured)
        .bind(product.stock as i64)
        .bind(&product.colors)
        .bind(&product.sizes)
        .bind(product.rating)
        .bind(product.review_count as i64)
        .bind(&product.brand)
        .bind(&product.weight)
        .bind(&product.dimensions)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ALL_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        row.as_ref().map(row_to_product).transpose().map_err(corrupt)
    }

    async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StoreError> {
        // NULL binds keep the stored value; an empty `images` array still
        // overwrites (explicit clear).
        let row = sqlx::query(&format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                image = COALESCE($6, image),
                images = COALESCE($7, images),
                is_featured = COALESCE($8, is_featured),
                updated_at = $9
            WHERE id = $1
            RETURNING {ALL_COLUMNS}
            "#
        ))
        .bind(Uuid::from(id))
        .bind(update.name)
        .bind(update.description)
        .bind(update.price)
        .bind(update.category)
        .bind(update.image)
        .bind(update.images)
        .bind(update.is_featured)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        row.as_ref().map(row_to_product).transpose().map_err(corrupt)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ALL_COLUMNS} FROM products ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        rows.iter().map(row_to_product).collect::<Result<_, _>>().map_err(corrupt)
    }

    async fn list_featured(&self) -> Result<Vec<LeanProduct>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, description, image, price FROM products \
             WHERE is_featured ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        rows.iter().map(row_to_lean).collect::<Result<_, _>>().map_err(corrupt)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ALL_COLUMNS} FROM products WHERE category = $1 ORDER BY created_at, id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        rows.iter().map(row_to_product).collect::<Result<_, _>>().map_err(corrupt)
    }

    async fn sample_random(&self, count: usize) -> Result<Vec<LeanProduct>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, description, image, price FROM products \
             ORDER BY random() LIMIT $1",
        )
        .bind(count as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        rows.iter().map(row_to_lean).collect::<Result<_, _>>().map_err(corrupt)
    }
}
