use std::sync::Arc;

use fairway_reserve::ReservationManager;
use tokio::time::{interval, Duration};
use tracing::{error, info};

/// Periodic expiry sweep. Optional: lazy on-touch expiry already keeps
/// the state machine correct, this only shortens how long an overdue
/// hold can look RESERVED.
pub async fn start_expiry_sweeper(manager: Arc<ReservationManager>, interval_seconds: u64) {
    let mut ticker = interval(Duration::from_secs(interval_seconds));
    info!("Expiry sweeper started, interval {}s", interval_seconds);

    loop {
        ticker.tick().await;
        match manager.sweep_expired().await {
            Ok(0) => {}
            Ok(count) => info!("Swept {} expired holds back to AVAILABLE", count),
            Err(e) => error!("Expiry sweep failed: {}", e),
        }
    }
}
