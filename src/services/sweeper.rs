use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::info;

use crate::AppState;

/// Background reclaim of holds whose TTL elapsed without renewal or
/// conversion. Best-effort and idempotent: the per-event reclaim
/// re-checks that the scanned hold is still the seat's current owner,
/// so two overlapping sweeps never double-free a re-held seat.
pub struct SweeperService {
    state: Arc<AppState>,
}

impl SweeperService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Fixed-interval sweep loop, spawned once at startup.
    pub async fn run(self) {
        let interval = self.state.config.sweep_interval();
        loop {
            sleep(interval).await;
            self.sweep_once(Utc::now()).await;
        }
    }

    /// One pass over every open event. Returns how many seats were
    /// returned to AVAILABLE.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> usize {
        let mut total = 0;
        for event in self.state.engine.events().await {
            let freed = event.sweep_expired(now).await;
            if freed.is_empty() {
                continue;
            }
            info!(
                event_id = event.event_id(),
                count = freed.len(),
                "released expired holds"
            );
            total += freed.len();
            self.state
                .engine
                .unindex_holds(freed.into_iter().map(|(hold_id, _)| hold_id))
                .await;
        }
        total
    }
}
