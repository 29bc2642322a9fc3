use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use product_aggregator::services::offers_api::{OfferSource, OffersApiClient, OffersApiError};

/// Local stand-in for the offers microservice. Hands out a fresh token per
/// `/auth` call and rejects the first offers request as if the token had
/// expired in the meantime.
#[derive(Default)]
struct OffersServiceStub {
    auth_calls: AtomicUsize,
    offer_calls: AtomicUsize,
    registered: Mutex<Vec<Value>>,
}

async fn auth(State(stub): State<Arc<OffersServiceStub>>) -> Json<Value> {
    let n = stub.auth_calls.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "access_token": format!("token-{}", n) }))
}

async fn product_offers(
    State(stub): State<Arc<OffersServiceStub>>,
    Path(product_id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if product_id == 404 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "msg": "product not found" })),
        ));
    }

    if stub.offer_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "expired token" })),
        ));
    }

    Ok(Json(json!([
        { "id": 1, "price": 1000, "items_in_stock": 2 },
        { "id": 2, "price": 230, "items_in_stock": 1 },
    ])))
}

async fn register(
    State(stub): State<Arc<OffersServiceStub>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.registered.lock().push(body);
    Json(json!({ "id": 1 }))
}

async fn spawn_stub() -> (Arc<OffersServiceStub>, String) {
    let stub = Arc::new(OffersServiceStub::default());
    let app = Router::new()
        .route("/auth", post(auth))
        .route("/products/{product_id}/offers", get(product_offers))
        .route("/products/register", post(register))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (stub, format!("http://{}", addr))
}

#[tokio::test]
async fn test_rejected_token_triggers_one_reauth_and_retry() {
    let (stub, base_url) = spawn_stub().await;
    let client = OffersApiClient::new(base_url).unwrap();

    // First offers request comes back 401; the client must re-authenticate
    // once and retry transparently
    let fetched = client.fetch_offers(7).await.unwrap();

    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].id, 1);
    assert_eq!(fetched[0].price, dec!(1000));
    assert_eq!(fetched[0].items_in_stock, 2);
    assert_eq!(fetched[1].id, 2);
    assert_eq!(fetched[1].price, dec!(230));

    // Bootstrap auth plus exactly one re-auth after the 401
    assert_eq!(stub.auth_calls.load(Ordering::SeqCst), 2);
    assert_eq!(stub.offer_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_explicit_refresh_token_is_reused() {
    let (stub, base_url) = spawn_stub().await;
    let client = OffersApiClient::new(base_url).unwrap();

    client.refresh_token().await.unwrap();
    assert_eq!(stub.auth_calls.load(Ordering::SeqCst), 1);

    // The startup token is reused; only the simulated expiry forces one more
    client.fetch_offers(7).await.unwrap();
    assert_eq!(stub.auth_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_api_error_status_and_message_are_surfaced() {
    let (stub, base_url) = spawn_stub().await;
    let client = OffersApiClient::new(base_url).unwrap();

    let err = client.fetch_offers(404).await.unwrap_err();
    match err {
        OffersApiError::Api { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("product not found"));
        }
        other => panic!("expected Api error, got {}", other),
    }

    // Only the bootstrap auth; a 404 must not trigger re-auth
    assert_eq!(stub.auth_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_register_product_sends_payload() {
    let (stub, base_url) = spawn_stub().await;
    let client = OffersApiClient::new(base_url).unwrap();

    client
        .register_product(42, "Lawnmower", "Best lawnmower in the world")
        .await
        .unwrap();

    let registered = stub.registered.lock();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0]["id"], 42);
    assert_eq!(registered[0]["name"], "Lawnmower");
    assert_eq!(registered[0]["description"], "Best lawnmower in the world");
}
