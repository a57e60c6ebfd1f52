//! Hold manager: the sole mutator of seat status.
//!
//! Every operation takes the event's write lock for the duration of the
//! check-and-set only, never across an await point. That serializes
//! per-seat transitions and makes the registry flip plus the store
//! mutation one indivisible step, so a seat is never HELD without a
//! matching hold record or vice versa.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Hold, SeatStatus};

use super::error::HoldError;
use super::registry::CasError;
use super::EventEngine;

/// Parameters for a hold claim.
#[derive(Debug, Clone)]
pub struct NewHold {
    pub seat_id: i64,
    pub owner_session_id: String,
    pub owner_user_id: Option<i64>,
    pub ticket_type_id: String,
    pub ttl_seconds: u64,
}

fn cas_to_hold_error(err: CasError) -> HoldError {
    match err {
        CasError::SeatNotFound(seat_id) => HoldError::SeatNotFound(seat_id),
        CasError::StatusMismatch { seat_id, actual } => HoldError::SeatUnavailable {
            seat_id,
            status: actual,
        },
    }
}

fn expiry(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    // expires_at must stay strictly after created_at
    now + Duration::seconds(ttl_seconds.max(1) as i64)
}

impl EventEngine {
    /// Claims a seat for a session. Exactly one of two racing calls on
    /// the same seat succeeds; the loser gets `SeatUnavailable` and the
    /// shopper picks another seat.
    pub async fn create_hold(&self, req: NewHold) -> Result<Hold, HoldError> {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let live = state
            .store
            .live_count_for_session(&req.owner_session_id, now);
        if live >= self.limits.max_holds_per_session {
            return Err(HoldError::HoldLimitExceeded {
                limit: self.limits.max_holds_per_session,
            });
        }

        state
            .registry
            .compare_and_set(req.seat_id, SeatStatus::Available, SeatStatus::Held)
            .map_err(cas_to_hold_error)?;

        let hold = Hold {
            id: Uuid::new_v4(),
            seat_id: req.seat_id,
            owner_session_id: req.owner_session_id,
            owner_user_id: req.owner_user_id,
            ticket_type_id: req.ticket_type_id,
            created_at: now,
            expires_at: expiry(now, req.ttl_seconds),
        };
        state.store.insert(hold.clone());
        self.feed.publish(hold.seat_id, SeatStatus::Held);

        debug!(
            event_id = self.event_id,
            seat_id = hold.seat_id,
            hold_id = %hold.id,
            expires_at = %hold.expires_at,
            "hold created"
        );
        Ok(hold)
    }

    /// Pushes a hold's expiry out to `now + ttl`. The new deadline is
    /// absolute, not cumulative with whatever was left.
    pub async fn renew_hold(
        &self,
        hold_id: Uuid,
        session_id: &str,
        ttl_seconds: u64,
    ) -> Result<Hold, HoldError> {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let hold = state.store.get(hold_id).ok_or(HoldError::HoldNotFound(hold_id))?;
        if hold.is_expired_at(now) {
            return Err(HoldError::HoldExpired(hold_id));
        }
        if hold.owner_session_id != session_id {
            return Err(HoldError::NotOwner);
        }

        let expires_at = expiry(now, ttl_seconds);
        let renewed = state
            .store
            .reschedule(hold_id, expires_at)
            .cloned()
            .ok_or(HoldError::HoldNotFound(hold_id))?;
        debug!(event_id = self.event_id, hold_id = %hold_id, expires_at = %expires_at, "hold renewed");
        Ok(renewed)
    }

    /// Drops a hold and frees its seat. Releasing a hold that no longer
    /// exists is a no-op success so that best-effort client cleanup
    /// never surfaces an error.
    pub async fn release_hold(&self, hold_id: Uuid, session_id: &str) -> Result<(), HoldError> {
        let mut state = self.state.write().await;

        let Some(hold) = state.store.get(hold_id) else {
            return Ok(());
        };
        if hold.owner_session_id != session_id {
            return Err(HoldError::NotOwner);
        }
        let seat_id = hold.seat_id;

        state.store.remove(hold_id);
        if let Err(err) = state
            .registry
            .compare_and_set(seat_id, SeatStatus::Held, SeatStatus::Available)
        {
            warn!(event_id = self.event_id, seat_id, ?err, "seat not HELD while releasing its hold");
            return Ok(());
        }
        self.feed.publish(seat_id, SeatStatus::Available);

        debug!(event_id = self.event_id, seat_id, hold_id = %hold_id, "hold released");
        Ok(())
    }

    /// Converts a live hold into a completed sale: the hold record goes
    /// away and the seat becomes SOLD for good. Triggered by checkout
    /// completion, which owns `sale_ref`.
    pub async fn convert_hold(&self, hold_id: Uuid, sale_ref: String) -> Result<i64, HoldError> {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let hold = state.store.get(hold_id).ok_or(HoldError::HoldNotFound(hold_id))?;
        if hold.is_expired_at(now) {
            return Err(HoldError::HoldExpired(hold_id));
        }
        let seat_id = hold.seat_id;

        state.store.remove(hold_id);
        if let Err(err) = state
            .registry
            .compare_and_set(seat_id, SeatStatus::Held, SeatStatus::Sold)
        {
            warn!(event_id = self.event_id, seat_id, ?err, "seat not HELD while converting its hold");
        }
        state.registry.set_sale_ref(seat_id, sale_ref);
        self.feed.publish(seat_id, SeatStatus::Sold);

        debug!(event_id = self.event_id, seat_id, hold_id = %hold_id, "hold converted to sale");
        Ok(seat_id)
    }

    /// Reclaims holds whose TTL elapsed, returning the freed
    /// `(hold_id, seat_id)` pairs. Scan runs under the read lock; each
    /// reclaim re-checks under the write lock that the seat's current
    /// hold is still the one scanned, so a hold that was released,
    /// converted, or succeeded by a newer claim in between is skipped.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<(Uuid, i64)> {
        let due = { self.state.read().await.store.expired_at(now) };
        if due.is_empty() {
            return Vec::new();
        }

        let mut freed = Vec::new();
        let mut state = self.state.write().await;
        for hold_id in due {
            let Some(hold) = state.store.get(hold_id) else {
                continue;
            };
            if !hold.is_expired_at(now) {
                // renewed between scan and reclaim
                continue;
            }
            let seat_id = hold.seat_id;
            if state.store.hold_for_seat(seat_id).map(|h| h.id) != Some(hold_id) {
                continue;
            }

            state.store.remove(hold_id);
            if let Err(err) = state
                .registry
                .compare_and_set(seat_id, SeatStatus::Held, SeatStatus::Available)
            {
                warn!(event_id = self.event_id, seat_id, ?err, "seat not HELD while sweeping its hold");
                continue;
            }
            self.feed.publish(seat_id, SeatStatus::Available);
            freed.push((hold_id, seat_id));
        }
        freed
    }
}
