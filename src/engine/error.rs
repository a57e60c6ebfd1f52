use thiserror::Error;
use uuid::Uuid;

use crate::models::SeatStatus;

/// Error taxonomy of the hold lifecycle.
///
/// Conflict errors (`SeatUnavailable`, `HoldExpired`, `NotOwner`) are
/// expected and user-recoverable; the engine never retries them.
/// `HoldLimitExceeded` is a policy rejection. Not-found errors mean the
/// client's view is stale and it should refresh its snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoldError {
    #[error("event {0} not found")]
    EventNotFound(i64),
    #[error("event {0} is already open for sales")]
    EventExists(i64),
    #[error("invalid seating chart: {0}")]
    InvalidChart(String),
    #[error("seat {0} not found")]
    SeatNotFound(i64),
    #[error("seat {seat_id} is {status}")]
    SeatUnavailable { seat_id: i64, status: SeatStatus },
    #[error("session already holds the maximum of {limit} seats")]
    HoldLimitExceeded { limit: usize },
    #[error("hold {0} not found")]
    HoldNotFound(Uuid),
    #[error("hold {0} has expired")]
    HoldExpired(Uuid),
    #[error("hold belongs to a different session")]
    NotOwner,
}
