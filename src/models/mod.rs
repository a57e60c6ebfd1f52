pub mod chart;
pub mod hold;
pub mod seat;

pub use chart::{PriceCategory, SeatSpec, SeatingChart};
pub use hold::Hold;
pub use seat::{Seat, SeatStatus};
