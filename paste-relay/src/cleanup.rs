//! Background sweep task for expired store entries.
//!
//! Reads already hide expired entries; the sweep only reclaims their memory.

use crate::storage::RelayStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Spawn a background sweep task.
///
/// Returns `None` when the store has no TTL. Otherwise returns a handle that
/// can be used to abort the task.
pub fn spawn_sweep_task(
    store: Arc<RelayStore>,
    every: Option<Duration>,
) -> Option<tokio::task::JoinHandle<()>> {
    let Some(every) = every.filter(|_| store.ttl().is_some()) else {
        tracing::info!("Sweep task disabled (no TTL)");
        return None;
    };

    Some(tokio::spawn(async move {
        tracing::info!("Sweep task started (interval: {}s)", every.as_secs());

        let mut timer = interval(every);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        timer.tick().await;

        loop {
            timer.tick().await;

            match store.sweep() {
                Ok(evicted) => {
                    if evicted > 0 {
                        tracing::info!("Sweep: evicted {} expired entries", evicted);
                    } else {
                        tracing::debug!("Sweep: no expired entries");
                    }
                }
                Err(e) => {
                    tracing::error!("Sweep error: {}", e);
                }
            }
        }
    }))
}
