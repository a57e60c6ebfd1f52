use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::{HoldError, SeatChange};
use crate::models::Seat;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/events/{event_id}/seats", get(get_seats))
}

#[derive(Debug, Deserialize)]
struct SeatsQuery {
    /// Feed version the client last saw; enables delta responses.
    since: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeatsResponse {
    version: u64,
    full: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    seats: Option<Vec<Seat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    changes: Option<Vec<SeatChange>>,
}

fn etag_for(version: u64) -> String {
    format!("\"v{version}\"")
}

// GET /api/events/{event_id}/seats
//
// Polling read path. Honors If-None-Match against the feed version and
// serves a bounded delta when `since` is within the retained change
// window; otherwise falls back to the full snapshot.
async fn get_seats(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Query(params): Query<SeatsQuery>,
    headers: HeaderMap,
) -> Result<Response, HoldError> {
    let event = state.engine.event(event_id).await?;

    let current = event.feed_version();
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    if if_none_match == Some(etag_for(current).as_str()) {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag_for(current))],
        )
            .into_response());
    }

    if let Some(since) = params.since {
        if let Some(changes) = event.delta_since(since) {
            let version = changes.last().map(|c| c.version).unwrap_or(current);
            let body = SeatsResponse {
                version,
                full: false,
                seats: None,
                changes: Some(changes),
            };
            return Ok(([(header::ETAG, etag_for(version))], Json(body)).into_response());
        }
    }

    let (version, seats) = event.snapshot().await;
    let body = SeatsResponse {
        version,
        full: true,
        seats: Some(seats),
        changes: None,
    };
    Ok(([(header::ETAG, etag_for(version))], Json(body)).into_response())
}
