pub mod events;
pub mod holds;
pub mod seats;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::engine::HoldError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(seats::routes())
        .merge(holds::routes())
}

// Wire mapping of the engine's error taxonomy. Conflicts are 409, the
// session cap is 429, expired holds are 410 Gone, ownership failures 403.
impl IntoResponse for HoldError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            HoldError::EventNotFound(_)
            | HoldError::SeatNotFound(_)
            | HoldError::HoldNotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "reason": "not_found", "message": self.to_string() }),
            ),
            HoldError::EventExists(_) => (
                StatusCode::CONFLICT,
                json!({ "reason": "event_exists", "message": self.to_string() }),
            ),
            HoldError::InvalidChart(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "reason": "bad_chart", "message": self.to_string() }),
            ),
            HoldError::SeatUnavailable { status, .. } => (
                StatusCode::CONFLICT,
                json!({ "reason": "unavailable", "status": status, "message": self.to_string() }),
            ),
            HoldError::HoldLimitExceeded { limit } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "reason": "hold_limit", "limit": limit }),
            ),
            HoldError::HoldExpired(_) => (
                StatusCode::GONE,
                json!({ "reason": "expired", "message": self.to_string() }),
            ),
            HoldError::NotOwner => (
                StatusCode::FORBIDDEN,
                json!({ "reason": "not_owner", "message": self.to_string() }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
