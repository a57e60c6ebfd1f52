use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::engine::HoldError;
use crate::models::SeatingChart;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events", post(open_event))
        .route("/events/{event_id}", axum::routing::delete(close_event))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventSummary {
    id: i64,
    title: String,
}

async fn list_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut events: Vec<EventSummary> = state
        .engine
        .events()
        .await
        .into_iter()
        .map(|e| EventSummary {
            id: e.event_id(),
            title: e.title().to_string(),
        })
        .collect();
    events.sort_by_key(|e| e.id);
    Json(events)
}

// POST /api/events — open an event for sales with its seating chart
async fn open_event(
    State(state): State<Arc<AppState>>,
    Json(chart): Json<SeatingChart>,
) -> Result<impl IntoResponse, HoldError> {
    let event_id = chart.event_id;
    let seats = chart.seats.len();
    state.engine.open_event(chart).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "eventId": event_id, "seats": seats })),
    ))
}

// DELETE /api/events/{event_id} — close sales and tear the state down
async fn close_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, HoldError> {
    state.engine.close_event(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
