//! Background sweep of expired refresh-token records
//!
//! Refresh already rejects expired records at exchange time; the sweep only
//! reclaims storage. It never touches live records, so it cannot change the
//! outcome of any refresh call. The task runs independently of the request
//! path and tolerates store errors (logs, retries next cycle).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use motors_store::SessionStore;

/// Spawn a background task that periodically deletes expired refresh-token
/// records.
///
/// Returns a `JoinHandle` for the spawned task.
pub fn spawn_purge_task(
    store: Arc<dyn SessionStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Skip the immediate first tick — the store was just loaded
        ticker.tick().await;

        loop {
            ticker.tick().await;
            purge_cycle(store.as_ref()).await;
        }
    })
}

/// Run one sweep over the store.
async fn purge_cycle(store: &dyn SessionStore) {
    match store.purge_expired(Utc::now()).await {
        Ok(0) => {}
        Ok(removed) => info!(removed, "purged expired refresh tokens"),
        Err(e) => warn!(error = %e, "refresh-token purge failed, will retry next cycle"),
    }
}
