use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use storefront_catalog::{ProductDraft, ProductPatch};
use storefront_core::ProductId;
use storefront_infra::orchestrator::DEFAULT_RECOMMENDED_COUNT;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/featured", get(featured_products))
        .route("/category/:category", get(products_by_category))
        .route("/recommendations", get(recommended_products))
        .route(
            "/:id",
            put(update_product).patch(toggle_featured).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
    })
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.all().await {
        Ok(products) => {
            (StatusCode::OK, Json(serde_json::json!({ "products": products }))).into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn featured_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.featured().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn products_by_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(category): Path<String>,
) -> axum::response::Response {
    match services.catalog.by_category(&category).await {
        Ok(products) => {
            (StatusCode::OK, Json(serde_json::json!({ "products": products }))).into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn recommended_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::RecommendedQuery>,
) -> axum::response::Response {
    let count = query.count.unwrap_or(DEFAULT_RECOMMENDED_COUNT);
    match services.catalog.recommended(count).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ProductDraft>,
) -> axum::response::Response {
    match services.catalog.create(body).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductPatch>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.catalog.update(id, body).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn toggle_featured(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.catalog.toggle_featured(id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.catalog.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Product deleted successfully" })),
        )
            .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
