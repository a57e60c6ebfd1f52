use serde::{Deserialize, Serialize};
use std::fmt;

/// Seat lifecycle status. Exactly one status at any instant; transitions
/// are serialized per seat by the hold manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeatStatus {
    Available,
    Held,
    Sold,
    Blocked,
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatStatus::Available => write!(f, "AVAILABLE"),
            SeatStatus::Held => write!(f, "HELD"),
            SeatStatus::Sold => write!(f, "SOLD"),
            SeatStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: i64,
    pub row: i32,
    pub number: i32,
    pub section: String,
    pub price_category_id: String,
    pub is_accessible: bool,
    pub status: SeatStatus,
    /// Reference to the completed sale, set when a hold is converted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_ref: Option<String>,
}
