pub mod health;
pub mod price_history;
pub mod product;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::error;

use crate::models::ErrorResponse;
use crate::AppState;

pub(crate) type HandlerError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn db_error(e: sea_orm::DbErr) -> HandlerError {
    error!(error = %e, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Database error: {}", e),
            code: Some("DATABASE_ERROR".to_string()),
        }),
    )
}

pub(crate) fn product_not_found(product_id: i32) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Product {} not found", product_id),
            code: Some("PRODUCT_NOT_FOUND".to_string()),
        }),
    )
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/products", post(product::create_product))
        .route(
            "/products/{product_id}",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route(
            "/products/{product_id}/offers",
            get(product::get_product_offers),
        )
        .route(
            "/products/{product_id}/history",
            get(price_history::get_price_history),
        )
        .route(
            "/products/{product_id}/price-change",
            get(price_history::get_price_change),
        )
        .with_state(state)
}
