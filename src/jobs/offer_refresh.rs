//! Offer refresh job
//!
//! Periodically pulls the current offers for every tracked product from the
//! offers service and records an average-price snapshot per product.
//! Supports graceful shutdown via a watch channel flipped on SIGINT.

use sea_orm::DatabaseConnection;
use std::env;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{error, info};

use crate::services::offer_sync::OfferSyncService;
use crate::services::offers_api::OfferSource;

/// Default refresh interval in seconds
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Environment variable for the refresh interval
const ENV_REFRESH_INTERVAL: &str = "OFFER_REFRESH_INTERVAL_SECS";

/// Periodic offer refresh loop with an explicit lifecycle.
///
/// Constructed with its dependencies and an interval; `run` drives one sync
/// cycle per tick until the shutdown channel fires. Products are processed
/// sequentially within a cycle; per-product failures are handled inside
/// [`OfferSyncService::sync_all_products`] and never stop the loop.
pub struct OfferRefreshJob {
    sync: OfferSyncService,
    interval: TokioDuration,
}

impl OfferRefreshJob {
    pub fn new(
        db: DatabaseConnection,
        source: Arc<dyn OfferSource>,
        interval: TokioDuration,
    ) -> Self {
        Self {
            sync: OfferSyncService::new(db, source),
            interval,
        }
    }

    /// Refresh interval from `OFFER_REFRESH_INTERVAL_SECS`, default 60s.
    pub fn interval_from_env() -> TokioDuration {
        let secs: u64 = env::var(ENV_REFRESH_INTERVAL)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
        TokioDuration::from_secs(secs)
    }

    /// Run until `shutdown` observes a change; the sleep between cycles is
    /// interruptible so shutdown never waits for the next tick.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);

        info!(
            interval_secs = self.interval.as_secs(),
            "Offer refresh job started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Shutdown signal received, stopping offer refresh job");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sync.sync_all_products().await {
                        error!(error = %e, "Offer refresh cycle failed");
                        // Next tick retries
                    }
                }
            }
        }

        info!("Offer refresh job stopped");
    }
}

/// Spawn the offer refresh job on the runtime.
pub fn start_offer_refresh_job(
    db: DatabaseConnection,
    source: Arc<dyn OfferSource>,
    shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    let job = OfferRefreshJob::new(db, source, OfferRefreshJob::interval_from_env());
    tokio::spawn(job.run(shutdown))
}
