//! Price history queries
//!
//! Snapshot lookup, nearest-in-time interpolation and relative price change
//! between two points in time.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder};

use crate::entities::{prelude::*, price_snapshots};

/// Error types for price history queries, distinguishable by the caller
#[derive(Debug, PartialEq)]
pub enum PriceHistoryError {
    /// Referenced product does not exist
    ProductNotFound(i32),
    /// Product exists but has no snapshots yet
    NoData(i32),
    /// Start price resolved to zero; the ratio is rejected, never infinity
    UndefinedRatio,
    /// Computed ratio has no f64 representation
    RatioOutOfRange,
    DatabaseError(String),
}

impl std::fmt::Display for PriceHistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceHistoryError::ProductNotFound(id) => write!(f, "Product {} not found", id),
            PriceHistoryError::NoData(id) => {
                write!(f, "Product {} has no price snapshots", id)
            }
            PriceHistoryError::UndefinedRatio => {
                write!(f, "Start price is zero, relative change is undefined")
            }
            PriceHistoryError::RatioOutOfRange => {
                write!(f, "Price ratio is not representable as a float")
            }
            PriceHistoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for PriceHistoryError {}

fn db_err(e: sea_orm::DbErr) -> PriceHistoryError {
    PriceHistoryError::DatabaseError(e.to_string())
}

/// Nearest-neighbor interpolation over a snapshot history in stored order.
///
/// Returns the snapshot whose timestamp has the smallest absolute distance
/// to `at`. The candidate is only replaced on a strictly smaller distance,
/// so equidistant snapshots resolve to the earliest-stored one. The result
/// is always an observed price, never a blend of two observations.
pub fn nearest_snapshot(
    snapshots: &[price_snapshots::Model],
    at: DateTime<Utc>,
) -> Option<&price_snapshots::Model> {
    let mut nearest: Option<(&price_snapshots::Model, i64)> = None;

    for snapshot in snapshots {
        let distance = snapshot
            .timestamp
            .signed_duration_since(at)
            .num_milliseconds()
            .abs();

        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((snapshot, distance)),
        }
    }

    nearest.map(|(snapshot, _)| snapshot)
}

/// `end / start` as a relative ratio: 1.0 unchanged, 2.0 doubled, 0.5 halved.
pub fn relative_change(start: Decimal, end: Decimal) -> Result<f64, PriceHistoryError> {
    if start.is_zero() {
        return Err(PriceHistoryError::UndefinedRatio);
    }
    // 0.0 is a meaningful ratio, so a failed conversion must not default to it
    (end / start)
        .to_f64()
        .ok_or(PriceHistoryError::RatioOutOfRange)
}

async fn ensure_product(db: &DatabaseConnection, product_id: i32) -> Result<(), PriceHistoryError> {
    Products::find_by_id(product_id)
        .one(db)
        .await
        .map_err(db_err)?
        .map(|_| ())
        .ok_or(PriceHistoryError::ProductNotFound(product_id))
}

/// Load a product's full snapshot history, oldest observation first.
///
/// Ordered by timestamp; id breaks ties among snapshots sharing one, so the
/// order is stable within a query.
pub async fn product_history(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<Vec<price_snapshots::Model>, PriceHistoryError> {
    ensure_product(db, product_id).await?;

    PriceSnapshots::find()
        .filter(price_snapshots::Column::ProductId.eq(product_id))
        .order_by(price_snapshots::Column::Timestamp, Order::Asc)
        .order_by(price_snapshots::Column::Id, Order::Asc)
        .all(db)
        .await
        .map_err(db_err)
}

/// Relative price change between the snapshots nearest to `from` and `to`.
///
/// The two timestamps are resolved independently against the same history;
/// callers may pass them in either order and get the reciprocal ratio back.
pub async fn price_change(
    db: &DatabaseConnection,
    product_id: i32,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<f64, PriceHistoryError> {
    let history = product_history(db, product_id).await?;

    let start = nearest_snapshot(&history, from).ok_or(PriceHistoryError::NoData(product_id))?;
    let end = nearest_snapshot(&history, to).ok_or(PriceHistoryError::NoData(product_id))?;

    relative_change(start.price, end.price)
}
