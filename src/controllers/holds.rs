use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::{HoldError, NewHold};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events/{event_id}/holds", post(create_hold))
        .route("/holds/{hold_id}", patch(renew_hold))
        .route("/holds/{hold_id}", delete(release_hold))
        .route("/holds/{hold_id}/convert", post(convert_hold))
}

/* ---------- create ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateHoldRequest {
    seat_id: i64,
    session_id: String,
    user_id: Option<i64>,
    ticket_type_id: String,
    ttl_seconds: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateHoldResponse {
    hold_id: Uuid,
    seat_id: i64,
    expires_at: DateTime<Utc>,
}

// POST /api/events/{event_id}/holds
async fn create_hold(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(req): Json<CreateHoldRequest>,
) -> Result<impl IntoResponse, HoldError> {
    let ttl_seconds = req
        .ttl_seconds
        .unwrap_or(state.config.holds.default_ttl_seconds);
    let hold = state
        .engine
        .create_hold(
            event_id,
            NewHold {
                seat_id: req.seat_id,
                owner_session_id: req.session_id,
                owner_user_id: req.user_id,
                ticket_type_id: req.ticket_type_id,
                ttl_seconds,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateHoldResponse {
            hold_id: hold.id,
            seat_id: hold.seat_id,
            expires_at: hold.expires_at,
        }),
    ))
}

/* ---------- renew ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenewHoldRequest {
    session_id: String,
    ttl_seconds: Option<u64>,
}

// PATCH /api/holds/{hold_id}
async fn renew_hold(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
    Json(req): Json<RenewHoldRequest>,
) -> Result<impl IntoResponse, HoldError> {
    let ttl_seconds = req
        .ttl_seconds
        .unwrap_or(state.config.holds.default_ttl_seconds);
    let hold = state
        .engine
        .renew_hold(hold_id, &req.session_id, ttl_seconds)
        .await?;
    Ok(Json(json!({ "expiresAt": hold.expires_at })))
}

/* ---------- release ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseHoldRequest {
    session_id: String,
}

// DELETE /api/holds/{hold_id} — idempotent best-effort cleanup
async fn release_hold(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
    Json(req): Json<ReleaseHoldRequest>,
) -> Result<StatusCode, HoldError> {
    state.engine.release_hold(hold_id, &req.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ---------- convert ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertHoldRequest {
    sale_ref: String,
}

// POST /api/holds/{hold_id}/convert — checkout completion owns this call
async fn convert_hold(
    State(state): State<Arc<AppState>>,
    Path(hold_id): Path<Uuid>,
    Json(req): Json<ConvertHoldRequest>,
) -> Result<impl IntoResponse, HoldError> {
    let seat_id = state.engine.convert_hold(hold_id, req.sale_ref).await?;
    Ok(Json(json!({ "seatId": seat_id, "status": "SOLD" })))
}
