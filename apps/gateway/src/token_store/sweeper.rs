use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use super::TokenStore;

/// Periodically reclaim expired tokens.
///
/// Lookups already ignore expired records; this only bounds storage growth.
/// `every` must be non-zero.
pub fn spawn_sweeper(store: Arc<dyn TokenStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.sweep_expired().await {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "swept expired tokens"),
                Err(e) => warn!(error = %e, "token sweep failed"),
            }
        }
    })
}
