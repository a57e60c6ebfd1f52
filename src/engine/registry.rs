use std::collections::HashMap;

use crate::models::{Seat, SeatStatus};

/// Outcome of a failed status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasError {
    SeatNotFound(i64),
    /// The seat exists but its status was not the expected one.
    StatusMismatch { seat_id: i64, actual: SeatStatus },
}

/// Source of truth for seat status within one event.
///
/// Pure data structure: all locking lives in the hold manager, which
/// serializes transitions per event and calls `compare_and_set` as the
/// single atomic step of every mutation.
#[derive(Debug)]
pub struct SeatRegistry {
    seats: HashMap<i64, Seat>,
}

impl SeatRegistry {
    pub fn new(seats: impl IntoIterator<Item = Seat>) -> Self {
        Self {
            seats: seats.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn get(&self, seat_id: i64) -> Option<&Seat> {
        self.seats.get(&seat_id)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Flips `seat_id` from `expected` to `next`, or reports why not.
    pub fn compare_and_set(
        &mut self,
        seat_id: i64,
        expected: SeatStatus,
        next: SeatStatus,
    ) -> Result<(), CasError> {
        let seat = self
            .seats
            .get_mut(&seat_id)
            .ok_or(CasError::SeatNotFound(seat_id))?;
        if seat.status != expected {
            return Err(CasError::StatusMismatch {
                seat_id,
                actual: seat.status,
            });
        }
        seat.status = next;
        Ok(())
    }

    /// Records the sale reference on a seat after a successful conversion.
    pub fn set_sale_ref(&mut self, seat_id: i64, sale_ref: String) {
        if let Some(seat) = self.seats.get_mut(&seat_id) {
            seat.sale_ref = Some(sale_ref);
        }
    }

    /// Full listing ordered by row then seat number.
    pub fn snapshot(&self) -> Vec<Seat> {
        let mut seats: Vec<Seat> = self.seats.values().cloned().collect();
        seats.sort_by_key(|s| (s.row, s.number));
        seats
    }
}
