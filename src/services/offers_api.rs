//! Offers service client
//!
//! HTTP client for the external offers microservice. Authenticates via
//! `POST /auth`, keeps the access token behind a lock and transparently
//! re-authenticates once when the service rejects a token.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Request timeout so an unreachable offers service cannot stall a sync cycle
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Error types for the offers service client
#[derive(Debug)]
pub enum OffersApiError {
    /// Network-level failure (connect, timeout, TLS)
    Transport(String),
    /// Non-success status from the offers service
    Api { status: u16, message: String },
    /// Authentication failed or no usable token
    Auth(String),
    /// Response body missing or malformed fields
    InvalidPayload(String),
}

impl std::fmt::Display for OffersApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OffersApiError::Transport(msg) => write!(f, "Transport error: {}", msg),
            OffersApiError::Api { status, message } => {
                write!(f, "Offers API error {}: {}", status, message)
            }
            OffersApiError::Auth(msg) => write!(f, "Auth error: {}", msg),
            OffersApiError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
        }
    }
}

impl std::error::Error for OffersApiError {}

/// One offer record as returned by the offers service
#[derive(Debug, Clone, Deserialize)]
pub struct FetchedOffer {
    /// Offer id assigned by the offers service
    pub id: i64,
    pub price: Decimal,
    pub items_in_stock: i32,
}

impl FetchedOffer {
    /// Field-level validation beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), OffersApiError> {
        if self.price < Decimal::ZERO {
            return Err(OffersApiError::InvalidPayload(format!(
                "offer {} has negative price {}",
                self.id, self.price
            )));
        }
        if self.items_in_stock < 0 {
            return Err(OffersApiError::InvalidPayload(format!(
                "offer {} has negative stock count {}",
                self.id, self.items_in_stock
            )));
        }
        Ok(())
    }
}

/// Seam for the external offer source, mockable in tests.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Fetch the current offer set for a product.
    async fn fetch_offers(&self, product_id: i32) -> Result<Vec<FetchedOffer>, OffersApiError>;

    /// Make the offers service aware of a newly created product.
    async fn register_product(
        &self,
        product_id: i32,
        name: &str,
        description: &str,
    ) -> Result<(), OffersApiError>;
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    msg: String,
}

/// Offers microservice client
#[derive(Clone)]
pub struct OffersApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl OffersApiClient {
    pub fn new(base_url: String) -> Result<Self, OffersApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OffersApiError::Transport(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Obtain a fresh access token from `POST /auth`.
    pub async fn refresh_token(&self) -> Result<(), OffersApiError> {
        let url = format!("{}/auth", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| OffersApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OffersApiError::Auth(format!(
                "authentication failed with status {}",
                response.status()
            )));
        }

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| OffersApiError::InvalidPayload(format!("auth response: {}", e)))?;

        *self.token.write() = Some(body.access_token);
        debug!("Offers service access token refreshed");
        Ok(())
    }

    async fn ensure_token(&self) -> Result<String, OffersApiError> {
        if let Some(token) = self.token.read().clone() {
            return Ok(token);
        }
        self.refresh_token().await?;
        self.token
            .read()
            .clone()
            .ok_or_else(|| OffersApiError::Auth("authentication yielded no token".to_string()))
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, OffersApiError> {
        let token = self.ensure_token().await?;
        let mut request = self.client.request(method, url).header("Bearer", token);
        if let Some(json) = body {
            request = request.json(json);
        }
        request
            .send()
            .await
            .map_err(|e| OffersApiError::Transport(e.to_string()))
    }

    /// Send an authorized request, re-authenticating once on a 401.
    async fn send_authorized(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, OffersApiError> {
        let mut response = self.dispatch(method.clone(), url, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            info!("Offers service rejected access token, re-authenticating");
            self.refresh_token().await?;
            response = self.dispatch(method, url, body).await?;
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.msg)
                .unwrap_or_else(|_| "no error detail".to_string());
            return Err(OffersApiError::Api { status, message });
        }

        Ok(response)
    }
}

#[async_trait]
impl OfferSource for OffersApiClient {
    async fn fetch_offers(&self, product_id: i32) -> Result<Vec<FetchedOffer>, OffersApiError> {
        let url = format!("{}/products/{}/offers", self.base_url, product_id);
        let response = self.send_authorized(Method::GET, &url, None).await?;

        let offers: Vec<FetchedOffer> = response
            .json()
            .await
            .map_err(|e| OffersApiError::InvalidPayload(format!("offers response: {}", e)))?;

        for offer in &offers {
            offer.validate()?;
        }

        debug!(product_id, count = offers.len(), "Fetched offers");
        Ok(offers)
    }

    async fn register_product(
        &self,
        product_id: i32,
        name: &str,
        description: &str,
    ) -> Result<(), OffersApiError> {
        let url = format!("{}/products/register", self.base_url);
        let payload = serde_json::json!({
            "id": product_id,
            "name": name,
            "description": description,
        });
        self.send_authorized(Method::POST, &url, Some(&payload))
            .await?;
        info!(product_id, "Product registered with offers service");
        Ok(())
    }
}
