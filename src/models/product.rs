//! Product request/response models

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::entities::{offers, products};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
}

/// Single offer in API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    pub id: i32,
    pub source_offer_id: i64,
    pub price: f64,
    pub items_in_stock: i32,
}

impl From<offers::Model> for OfferResponse {
    fn from(model: offers::Model) -> Self {
        Self {
            id: model.id,
            source_offer_id: model.source_offer_id,
            price: model.price.to_f64().unwrap_or(0.0),
            items_in_stock: model.items_in_stock,
        }
    }
}

/// Product with its current offer set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub offers: Vec<OfferResponse>,
}

impl ProductResponse {
    pub fn from_models(product: products::Model, current_offers: Vec<offers::Model>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            offers: current_offers.into_iter().map(OfferResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferListResponse {
    pub offers: Vec<OfferResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteProductResponse {
    pub deleted: bool,
}
