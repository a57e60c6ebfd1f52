pub mod error;
pub mod feed;
pub mod manager;
pub mod registry;
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::config::{FeedConfig, HoldConfig};
use crate::models::{Hold, PriceCategory, Seat, SeatingChart};

pub use error::HoldError;
pub use feed::SeatChange;
pub use manager::NewHold;

use feed::ChangeFeed;
use registry::SeatRegistry;
use store::HoldStore;

/// Shared mutable state of one event: seat registry plus hold store,
/// guarded together so the hold manager's transitions are indivisible.
#[derive(Debug)]
pub(crate) struct EngineState {
    pub(crate) registry: SeatRegistry,
    pub(crate) store: HoldStore,
}

/// Reservation state of a single event that is open for sales.
#[derive(Debug)]
pub struct EventEngine {
    pub(crate) event_id: i64,
    title: String,
    price_categories: Vec<PriceCategory>,
    pub(crate) limits: HoldConfig,
    pub(crate) state: RwLock<EngineState>,
    pub(crate) feed: ChangeFeed,
}

impl EventEngine {
    pub fn event_id(&self) -> i64 {
        self.event_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price_categories(&self) -> &[PriceCategory] {
        &self.price_categories
    }

    /// Consistent pair of (feed version, full seat listing). Taken under
    /// the read lock, so no transition can publish in between.
    pub async fn snapshot(&self) -> (u64, Vec<Seat>) {
        let state = self.state.read().await;
        (self.feed.version(), state.registry.snapshot())
    }

    /// Current feed version without touching seat state.
    pub fn feed_version(&self) -> u64 {
        self.feed.version()
    }

    pub fn delta_since(&self, since: u64) -> Option<Vec<SeatChange>> {
        self.feed.delta_since(since)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SeatChange> {
        self.feed.subscribe()
    }

    pub async fn hold(&self, hold_id: Uuid) -> Option<Hold> {
        self.state.read().await.store.get(hold_id).cloned()
    }
}

/// Top-level reservation engine: one `EventEngine` per event open for
/// sales, plus a hold-id index so `/holds/{id}` operations resolve
/// without an event id in the path.
pub struct Engine {
    limits: HoldConfig,
    feed: FeedConfig,
    events: RwLock<HashMap<i64, Arc<EventEngine>>>,
    hold_index: RwLock<HashMap<Uuid, i64>>,
}

impl Engine {
    pub fn new(limits: HoldConfig, feed: FeedConfig) -> Self {
        Self {
            limits,
            feed,
            events: RwLock::new(HashMap::new()),
            hold_index: RwLock::new(HashMap::new()),
        }
    }

    /// Opens an event for sales, building its registry from the chart.
    pub async fn open_event(&self, chart: SeatingChart) -> Result<Arc<EventEngine>, HoldError> {
        if chart.seats.is_empty() {
            return Err(HoldError::InvalidChart("chart has no seats".to_string()));
        }
        let mut seats: Vec<Seat> = Vec::with_capacity(chart.seats.len());
        let mut seen = std::collections::HashSet::new();
        for spec in chart.seats {
            if !seen.insert(spec.id) {
                return Err(HoldError::InvalidChart(format!(
                    "duplicate seat id {}",
                    spec.id
                )));
            }
            seats.push(spec.into_seat());
        }

        let seat_count = seats.len();

        let mut events = self.events.write().await;
        if events.contains_key(&chart.event_id) {
            return Err(HoldError::EventExists(chart.event_id));
        }
        let engine = Arc::new(EventEngine {
            event_id: chart.event_id,
            title: chart.title,
            price_categories: chart.price_categories,
            limits: self.limits.clone(),
            state: RwLock::new(EngineState {
                registry: SeatRegistry::new(seats),
                store: HoldStore::new(),
            }),
            feed: ChangeFeed::new(self.feed.log_capacity),
        });
        events.insert(chart.event_id, engine.clone());
        info!(event_id = chart.event_id, seats = seat_count, "event opened for sales");
        Ok(engine)
    }

    /// Tears down an event's registry, store, and feed.
    pub async fn close_event(&self, event_id: i64) -> Result<(), HoldError> {
        let removed = self.events.write().await.remove(&event_id);
        if removed.is_none() {
            return Err(HoldError::EventNotFound(event_id));
        }
        self.hold_index
            .write()
            .await
            .retain(|_, eid| *eid != event_id);
        info!(event_id, "event closed for sales");
        Ok(())
    }

    pub async fn event(&self, event_id: i64) -> Result<Arc<EventEngine>, HoldError> {
        self.events
            .read()
            .await
            .get(&event_id)
            .cloned()
            .ok_or(HoldError::EventNotFound(event_id))
    }

    pub async fn events(&self) -> Vec<Arc<EventEngine>> {
        self.events.read().await.values().cloned().collect()
    }

    pub async fn create_hold(&self, event_id: i64, req: NewHold) -> Result<Hold, HoldError> {
        let event = self.event(event_id).await?;
        let hold = event.create_hold(req).await?;
        self.hold_index.write().await.insert(hold.id, event_id);
        Ok(hold)
    }

    pub async fn renew_hold(
        &self,
        hold_id: Uuid,
        session_id: &str,
        ttl_seconds: u64,
    ) -> Result<Hold, HoldError> {
        let event = self.event_for_hold(hold_id).await?;
        event.renew_hold(hold_id, session_id, ttl_seconds).await
    }

    /// Idempotent: unknown hold ids are treated as already released.
    pub async fn release_hold(&self, hold_id: Uuid, session_id: &str) -> Result<(), HoldError> {
        let event_id = match self.hold_index.read().await.get(&hold_id).copied() {
            Some(id) => id,
            None => return Ok(()),
        };
        let Ok(event) = self.event(event_id).await else {
            return Ok(());
        };
        event.release_hold(hold_id, session_id).await?;
        self.hold_index.write().await.remove(&hold_id);
        Ok(())
    }

    pub async fn convert_hold(&self, hold_id: Uuid, sale_ref: String) -> Result<i64, HoldError> {
        let event = self.event_for_hold(hold_id).await?;
        let seat_id = event.convert_hold(hold_id, sale_ref).await?;
        self.hold_index.write().await.remove(&hold_id);
        Ok(seat_id)
    }

    /// Drops swept hold ids from the hold→event index.
    pub async fn unindex_holds(&self, hold_ids: impl IntoIterator<Item = Uuid>) {
        let mut index = self.hold_index.write().await;
        for id in hold_ids {
            index.remove(&id);
        }
    }

    async fn event_for_hold(&self, hold_id: Uuid) -> Result<Arc<EventEngine>, HoldError> {
        let event_id = self
            .hold_index
            .read()
            .await
            .get(&hold_id)
            .copied()
            .ok_or(HoldError::HoldNotFound(hold_id))?;
        self.event(event_id).await
    }
}
