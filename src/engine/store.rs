use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Hold;

/// Keyed storage of live holds.
///
/// Indexed by hold id, by seat id (one live hold per seat), and by
/// expiry so the sweeper reads due holds in order instead of scanning
/// everything. No business logic; the hold manager decides what may be
/// inserted or removed.
#[derive(Debug, Default)]
pub struct HoldStore {
    by_id: HashMap<Uuid, Hold>,
    by_seat: HashMap<i64, Uuid>,
    by_expiry: BTreeSet<(DateTime<Utc>, Uuid)>,
}

impl HoldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, hold_id: Uuid) -> Option<&Hold> {
        self.by_id.get(&hold_id)
    }

    pub fn hold_for_seat(&self, seat_id: i64) -> Option<&Hold> {
        self.by_seat.get(&seat_id).and_then(|id| self.by_id.get(id))
    }

    /// Inserts a hold, evicting any previous record under the same id or
    /// seat. One live hold per seat is a structural index constraint.
    pub fn insert(&mut self, hold: Hold) {
        self.remove(hold.id);
        if let Some(prev) = self.by_seat.get(&hold.seat_id).copied() {
            self.remove(prev);
        }
        self.by_seat.insert(hold.seat_id, hold.id);
        self.by_expiry.insert((hold.expires_at, hold.id));
        self.by_id.insert(hold.id, hold);
    }

    pub fn remove(&mut self, hold_id: Uuid) -> Option<Hold> {
        let hold = self.by_id.remove(&hold_id)?;
        self.by_seat.remove(&hold.seat_id);
        self.by_expiry.remove(&(hold.expires_at, hold.id));
        Some(hold)
    }

    /// Moves a hold to a new expiry, keeping the expiry index in step.
    /// Returns the updated hold.
    pub fn reschedule(&mut self, hold_id: Uuid, expires_at: DateTime<Utc>) -> Option<&Hold> {
        let hold = self.by_id.get_mut(&hold_id)?;
        self.by_expiry.remove(&(hold.expires_at, hold.id));
        hold.expires_at = expires_at;
        self.by_expiry.insert((hold.expires_at, hold.id));
        Some(&*hold)
    }

    /// Hold ids due at `now`, oldest expiry first.
    pub fn expired_at(&self, now: DateTime<Utc>) -> Vec<Uuid> {
        self.by_expiry
            .range(..=(now, Uuid::max()))
            .map(|(_, id)| *id)
            .collect()
    }

    /// Number of unexpired holds owned by `session`.
    pub fn live_count_for_session(&self, session: &str, now: DateTime<Utc>) -> usize {
        self.by_id
            .values()
            .filter(|h| h.owner_session_id == session && !h.is_expired_at(now))
            .count()
    }
}
