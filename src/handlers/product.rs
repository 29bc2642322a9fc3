//! Product CRUD handlers
//!
//! Registration, lookup, update and cascade deletion of tracked products,
//! plus the current-offers listing.

use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, Order, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::entities::{offers, prelude::*, price_snapshots, products};
use crate::handlers::{db_error, product_not_found, HandlerError};
use crate::models::product::{
    CreateProductRequest, DeleteProductResponse, OfferListResponse, OfferResponse,
    ProductResponse, UpdateProductRequest,
};
use crate::AppState;

async fn find_product(
    state: &AppState,
    product_id: i32,
) -> Result<products::Model, HandlerError> {
    Products::find_by_id(product_id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| product_not_found(product_id))
}

async fn current_offers(
    state: &AppState,
    product_id: i32,
) -> Result<Vec<offers::Model>, HandlerError> {
    Offers::find()
        .filter(offers::Column::ProductId.eq(product_id))
        .order_by(offers::Column::Id, Order::Asc)
        .all(&state.db)
        .await
        .map_err(db_error)
}

/// POST /products
///
/// Creates the product locally, then registers it with the offers service so
/// the next sync cycle can fetch offers for it. Registration is best effort:
/// a failure is logged but the local create stands.
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, HandlerError> {
    let created = products::ActiveModel {
        name: Set(payload.name),
        description: Set(payload.description),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(db_error)?;

    if let Err(e) = state
        .offer_source
        .register_product(created.id, &created.name, &created.description)
        .await
    {
        warn!(
            product_id = created.id,
            error = %e,
            "Failed to register product with offers service"
        );
    }

    info!(product_id = created.id, "Product created");
    Ok(Json(ProductResponse::from_models(created, Vec::new())))
}

/// GET /products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<ProductResponse>, HandlerError> {
    let product = find_product(&state, product_id).await?;
    let offer_rows = current_offers(&state, product_id).await?;
    Ok(Json(ProductResponse::from_models(product, offer_rows)))
}

/// PUT /products/{product_id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, HandlerError> {
    let product = find_product(&state, product_id).await?;

    let mut active = product.into_active_model();
    active.name = Set(payload.name);
    active.description = Set(payload.description);
    let updated = active.update(&state.db).await.map_err(db_error)?;

    let offer_rows = current_offers(&state, product_id).await?;
    info!(product_id, "Product updated");
    Ok(Json(ProductResponse::from_models(updated, offer_rows)))
}

/// DELETE /products/{product_id}
///
/// Cascades to the product's offers and snapshot history in one transaction.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<DeleteProductResponse>, HandlerError> {
    find_product(&state, product_id).await?;

    let txn = state.db.begin().await.map_err(db_error)?;

    Offers::delete_many()
        .filter(offers::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await
        .map_err(db_error)?;

    PriceSnapshots::delete_many()
        .filter(price_snapshots::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await
        .map_err(db_error)?;

    Products::delete_by_id(product_id)
        .exec(&txn)
        .await
        .map_err(db_error)?;

    txn.commit().await.map_err(db_error)?;

    info!(product_id, "Product deleted with offers and history");
    Ok(Json(DeleteProductResponse { deleted: true }))
}

/// GET /products/{product_id}/offers
pub async fn get_product_offers(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<OfferListResponse>, HandlerError> {
    find_product(&state, product_id).await?;
    let offer_rows = current_offers(&state, product_id).await?;

    Ok(Json(OfferListResponse {
        offers: offer_rows.into_iter().map(OfferResponse::from).collect(),
    }))
}
