// src/lib.rs

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use services::offers_api::OfferSource;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub offer_source: Arc<dyn OfferSource>,
}

pub mod entities {
    pub mod prelude;
    pub mod offers;
    pub mod price_snapshots;
    pub mod products;
}

pub mod services {
    pub mod offer_sync;
    pub mod offers_api;
    pub mod price_history;
}

pub mod handlers;
pub mod jobs;
pub mod models;
