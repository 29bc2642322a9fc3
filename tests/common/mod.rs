use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use product_aggregator::entities::products;
use product_aggregator::services::offers_api::{FetchedOffer, OfferSource, OffersApiError};
use product_aggregator::AppState;

/// In-memory SQLite database with the full schema applied.
///
/// The pool is pinned to a single connection; every connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Offer source stub with canned per-product responses.
#[derive(Default)]
pub struct StubOfferSource {
    offers: Mutex<HashMap<i32, Vec<FetchedOffer>>>,
    failing: Mutex<HashSet<i32>>,
    registered: Mutex<Vec<i32>>,
}

impl StubOfferSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offers(&self, product_id: i32, offers: Vec<FetchedOffer>) {
        self.offers.lock().insert(product_id, offers);
    }

    /// Make fetches for this product fail with a transport error.
    #[allow(dead_code)]
    pub fn fail_for(&self, product_id: i32) {
        self.failing.lock().insert(product_id);
    }

    #[allow(dead_code)]
    pub fn registered(&self) -> Vec<i32> {
        self.registered.lock().clone()
    }
}

#[async_trait]
impl OfferSource for StubOfferSource {
    async fn fetch_offers(&self, product_id: i32) -> Result<Vec<FetchedOffer>, OffersApiError> {
        if self.failing.lock().contains(&product_id) {
            return Err(OffersApiError::Transport("connection refused".to_string()));
        }
        Ok(self.offers.lock().get(&product_id).cloned().unwrap_or_default())
    }

    async fn register_product(
        &self,
        product_id: i32,
        _name: &str,
        _description: &str,
    ) -> Result<(), OffersApiError> {
        self.registered.lock().push(product_id);
        Ok(())
    }
}

/// App state backed by a fresh in-memory database and a stub offer source.
pub async fn test_state() -> (AppState, Arc<StubOfferSource>) {
    let db = setup_test_db().await.expect("test db setup failed");
    let source = Arc::new(StubOfferSource::new());
    let state = AppState {
        db,
        offer_source: source.clone(),
    };
    (state, source)
}

pub fn fetched_offer(id: i64, price: Decimal, items_in_stock: i32) -> FetchedOffer {
    FetchedOffer {
        id,
        price,
        items_in_stock,
    }
}

/// Insert a product row directly, bypassing the HTTP surface.
#[allow(dead_code)]
pub async fn insert_product(db: &DatabaseConnection, name: &str) -> products::Model {
    products::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{} description", name)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("product insert failed")
}
