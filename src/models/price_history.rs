//! Price history and price-change request/response models

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::entities::price_snapshots;

/// Query parameters for the price-change endpoint.
///
/// `from` and `to` are RFC 3339 timestamps; no ordering is enforced, a
/// swapped pair yields the reciprocal ratio.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceChangeQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Single snapshot in history responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshotEntry {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl From<price_snapshots::Model> for PriceSnapshotEntry {
    fn from(model: price_snapshots::Model) -> Self {
        Self {
            timestamp: model.timestamp.with_timezone(&Utc),
            price: model.price.to_f64().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryResponse {
    pub product_id: i32,
    pub history: Vec<PriceSnapshotEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangeResponse {
    pub product_id: i32,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// `end / start`: 1.0 unchanged, 2.0 doubled, 0.5 halved
    pub price_change: f64,
}
