use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_aggregator::handlers;
use product_aggregator::jobs::offer_refresh::start_offer_refresh_job;
use product_aggregator::services::offers_api::{OfferSource, OffersApiClient};
use product_aggregator::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,product_aggregator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    // Offers service client; the initial auth is best effort since the
    // client re-authenticates on demand
    let offers_base_url = env::var("OFFERS_BASE_URL").expect("OFFERS_BASE_URL must be set");
    let offers_client =
        OffersApiClient::new(offers_base_url).expect("Failed to build offers client");
    if let Err(e) = offers_client.refresh_token().await {
        tracing::warn!(error = %e, "Initial offers service auth failed, will retry on demand");
    }
    let offer_source: Arc<dyn OfferSource> = Arc::new(offers_client);

    // Background offer refresh with graceful shutdown signalling
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_job = start_offer_refresh_job(db.clone(), offer_source.clone(), shutdown_rx);

    let state = AppState { db, offer_source };

    // Build router
    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener.local_addr().expect("listener has a local address")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await
        .expect("Server error");

    // Let an in-flight sync cycle finish before exiting
    if let Err(e) = refresh_job.await {
        tracing::warn!(error = %e, "Offer refresh job did not shut down cleanly");
    }
}
