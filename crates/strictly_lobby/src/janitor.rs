//! Periodic removal of abandoned sessions.

use crate::registry::SessionRegistry;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

/// Spawns a task that sweeps empty sessions every `period`.
///
/// The registry status is logged after any sweep that removed something.
/// Abort the returned handle to stop it.
pub fn spawn_janitor(registry: SessionRegistry, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs_f64(), "Starting session janitor");
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = registry.cleanup_empty_sessions();
            debug!(removed, active = registry.count_active(), "Janitor sweep");
            if removed > 0 {
                registry.log_status();
            }
        }
    })
}
