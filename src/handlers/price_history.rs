//! Price history handlers
//!
//! GET /products/{id}/history and GET /products/{id}/price-change endpoints
//! over the snapshot time series.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::handlers::{db_error, product_not_found, HandlerError};
use crate::models::price_history::{
    PriceChangeQuery, PriceChangeResponse, PriceHistoryResponse, PriceSnapshotEntry,
};
use crate::models::ErrorResponse;
use crate::services::price_history::{self, PriceHistoryError};
use crate::AppState;

fn map_history_error(e: PriceHistoryError) -> HandlerError {
    match e {
        PriceHistoryError::ProductNotFound(id) => product_not_found(id),
        PriceHistoryError::NoData(id) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: format!("Product {} has no price data", id),
                code: Some("NO_PRICE_DATA".to_string()),
            }),
        ),
        PriceHistoryError::UndefinedRatio => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Start price is zero, relative change is undefined".to_string(),
                code: Some("UNDEFINED_RATIO".to_string()),
            }),
        ),
        PriceHistoryError::RatioOutOfRange => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Price ratio is not representable as a float".to_string(),
                code: Some("RATIO_OUT_OF_RANGE".to_string()),
            }),
        ),
        PriceHistoryError::DatabaseError(msg) => db_error(sea_orm::DbErr::Custom(msg)),
    }
}

/// GET /products/{product_id}/history
///
/// Returns the product's full snapshot history, oldest first.
pub async fn get_price_history(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<PriceHistoryResponse>, HandlerError> {
    let history = price_history::product_history(&state.db, product_id)
        .await
        .map_err(map_history_error)?;

    info!(product_id, count = history.len(), "Price history fetched");

    Ok(Json(PriceHistoryResponse {
        product_id,
        history: history.into_iter().map(PriceSnapshotEntry::from).collect(),
    }))
}

/// GET /products/{product_id}/price-change?from=..&to=..
///
/// Relative price change between the snapshots nearest to the two
/// timestamps: 1.0 unchanged, 2.0 doubled, 0.5 halved.
pub async fn get_price_change(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(query): Query<PriceChangeQuery>,
) -> Result<Json<PriceChangeResponse>, HandlerError> {
    let ratio = price_history::price_change(&state.db, product_id, query.from, query.to)
        .await
        .map_err(map_history_error)?;

    info!(product_id, ratio, "Price change computed");

    Ok(Json(PriceChangeResponse {
        product_id,
        from: query.from,
        to: query.to,
        price_change: ratio,
    }))
}
