//! Offer synchronization service
//!
//! One synchronization cycle per product: fetch the current offers from the
//! offers service, replace the stored offer set wholesale and append a single
//! average-price snapshot. The replace-and-append runs in one transaction so
//! readers never observe a half-applied cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entities::{offers, prelude::*, price_snapshots, products};
use crate::services::offers_api::{FetchedOffer, OfferSource, OffersApiError};

/// Error types for the offer synchronizer
#[derive(Debug)]
pub enum OfferSyncError {
    /// External fetch failed; the product keeps its previous offers
    Fetch(OffersApiError),
    /// The offers service returned zero offers; an average price is undefined
    EmptyFetchResult,
    DatabaseError(String),
}

impl std::fmt::Display for OfferSyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferSyncError::Fetch(e) => write!(f, "Fetch error: {}", e),
            OfferSyncError::EmptyFetchResult => {
                write!(f, "Offers service returned an empty offer list")
            }
            OfferSyncError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for OfferSyncError {}

fn db_err(e: sea_orm::DbErr) -> OfferSyncError {
    OfferSyncError::DatabaseError(e.to_string())
}

/// Arithmetic mean of the fetched offer prices, `None` for an empty list.
pub fn average_price(offers: &[FetchedOffer]) -> Option<Decimal> {
    if offers.is_empty() {
        return None;
    }
    let sum: Decimal = offers.iter().map(|o| o.price).sum();
    Some(sum / Decimal::from(offers.len() as u64))
}

/// Offer synchronization service
pub struct OfferSyncService {
    db: DatabaseConnection,
    source: Arc<dyn OfferSource>,
}

impl OfferSyncService {
    pub fn new(db: DatabaseConnection, source: Arc<dyn OfferSource>) -> Self {
        Self { db, source }
    }

    /// Run one synchronization cycle over every tracked product.
    ///
    /// Products are processed sequentially; a failure for one product is
    /// logged and does not abort the cycle for the rest. Returns the number
    /// of products synchronized successfully.
    pub async fn sync_all_products(&self) -> Result<usize, OfferSyncError> {
        let tracked = Products::find().all(&self.db).await.map_err(db_err)?;

        if tracked.is_empty() {
            debug!("No tracked products to synchronize");
            return Ok(0);
        }

        let total = tracked.len();
        let mut synced = 0;

        for product in tracked {
            match self.sync_product(&product).await {
                Ok(count) => {
                    synced += 1;
                    debug!(product_id = product.id, offers = count, "Offers refreshed");
                }
                Err(e) => {
                    warn!(
                        product_id = product.id,
                        error = %e,
                        "Offer sync failed for product, skipping"
                    );
                }
            }
        }

        info!(synced, total, "Offer sync cycle completed");
        Ok(synced)
    }

    /// Fetch the current offers for one product and apply them.
    pub async fn sync_product(&self, product: &products::Model) -> Result<usize, OfferSyncError> {
        let fetched = self
            .source
            .fetch_offers(product.id)
            .await
            .map_err(OfferSyncError::Fetch)?;

        self.apply_offers(product.id, &fetched, Utc::now()).await
    }

    /// Replace the product's offer set and append one average-price snapshot.
    ///
    /// An empty fetch leaves the previous offers and history untouched and
    /// fails with [`OfferSyncError::EmptyFetchResult`]. Returns the number of
    /// offers written.
    pub async fn apply_offers(
        &self,
        product_id: i32,
        fetched: &[FetchedOffer],
        at: DateTime<Utc>,
    ) -> Result<usize, OfferSyncError> {
        let avg_price = average_price(fetched).ok_or(OfferSyncError::EmptyFetchResult)?;

        for offer in fetched {
            offer.validate().map_err(OfferSyncError::Fetch)?;
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        Offers::delete_many()
            .filter(offers::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let rows: Vec<offers::ActiveModel> = fetched
            .iter()
            .map(|offer| offers::ActiveModel {
                source_offer_id: Set(offer.id),
                price: Set(offer.price),
                items_in_stock: Set(offer.items_in_stock),
                product_id: Set(product_id),
                ..Default::default()
            })
            .collect();

        Offers::insert_many(rows).exec(&txn).await.map_err(db_err)?;

        price_snapshots::ActiveModel {
            price: Set(avg_price),
            timestamp: Set(at.fixed_offset()),
            product_id: Set(product_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(fetched.len())
    }
}
