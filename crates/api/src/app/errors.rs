use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_infra::orchestrator::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        CatalogError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        CatalogError::Store(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
        CatalogError::ImageUpload(msg) => json_error(StatusCode::BAD_GATEWAY, "image_upload_error", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
