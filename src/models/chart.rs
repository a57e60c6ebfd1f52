use serde::{Deserialize, Serialize};

use super::seat::{Seat, SeatStatus};

/// Read-only price reference used to compute hold prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCategory {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Venue layout submitted when an event opens for sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingChart {
    pub event_id: i64,
    pub title: String,
    pub seats: Vec<SeatSpec>,
    #[serde(default)]
    pub price_categories: Vec<PriceCategory>,
}

/// Per-seat input record. Only AVAILABLE and BLOCKED are accepted as
/// initial statuses; HELD and SOLD are reachable through the engine only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSpec {
    pub id: i64,
    pub row: i32,
    pub number: i32,
    #[serde(default)]
    pub section: String,
    pub price_category_id: String,
    #[serde(default)]
    pub is_accessible: bool,
    #[serde(default)]
    pub blocked: bool,
}

impl SeatSpec {
    pub fn into_seat(self) -> Seat {
        let status = if self.blocked {
            SeatStatus::Blocked
        } else {
            SeatStatus::Available
        };
        Seat {
            id: self.id,
            row: self.row,
            number: self.number,
            section: self.section,
            price_category_id: self.price_category_id,
            is_accessible: self.is_accessible,
            status,
            sale_ref: None,
        }
    }
}
