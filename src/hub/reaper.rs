//! The background reaper task (§4.5, §5): a single `tokio::spawn` loop that
//! wakes on a fixed interval and evicts disconnect-grace entries that have
//! expired.

use std::sync::Arc;
use std::time::Duration;

use tracing::info_span;
use tracing::Instrument;

use crate::hub::Hub;

pub fn spawn_reaper(hub: Arc<Hub>, interval_secs: u64) -> tokio::task::JoinHandle<()> {
    tokio::spawn(
        async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                ticker.tick().await;
                hub.reap_expired();
            }
        }
        .instrument(info_span!("disconnect_reaper")),
    )
}
