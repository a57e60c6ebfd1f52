//! Router-level tests exercising the HTTP contract end to end against
//! an in-process engine.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use seat_holds::{app, config::Config, AppState};

fn test_app() -> Router {
    app(AppState::new(Config::from_env()))
}

fn chart_body(event_id: i64, seat_count: i64) -> Value {
    json!({
        "eventId": event_id,
        "title": "Integration Night",
        "seats": (1..=seat_count).map(|id| json!({
            "id": id,
            "row": 1,
            "number": id,
            "section": "A",
            "priceCategoryId": "pc1",
            "isAccessible": id == 1
        })).collect::<Vec<_>>(),
        "priceCategories": [{ "id": "pc1", "name": "Standard", "price": 25.0 }]
    })
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    send_with_headers(router, method, uri, body, &[]).await
}

async fn send_with_headers(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    extra_headers: &[(&str, &str)],
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, value)
}

async fn open_event(router: &Router, event_id: i64, seats: i64) {
    let (status, _, _) = send(router, "POST", "/api/events", Some(chart_body(event_id, seats))).await;
    assert_eq!(status, StatusCode::CREATED);
}

fn hold_body(seat_id: i64, session: &str, ttl: u64) -> Value {
    json!({
        "seatId": seat_id,
        "sessionId": session,
        "ticketTypeId": "tt001",
        "ttlSeconds": ttl
    })
}

#[tokio::test]
async fn health_endpoint_responds() {
    let router = test_app();
    let (status, _, _) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn opening_events_validates_the_chart() {
    let router = test_app();
    open_event(&router, 1, 4).await;

    let (status, _, body) = send(&router, "POST", "/api/events", Some(chart_body(1, 4))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["reason"], "event_exists");

    let mut dup = chart_body(2, 2);
    dup["seats"][1]["id"] = json!(1);
    let (status, _, body) = send(&router, "POST", "/api/events", Some(dup)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "bad_chart");

    let (status, _, body) = send(&router, "GET", "/api/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn hold_lifecycle_over_http() {
    let router = test_app();
    open_event(&router, 1, 4).await;

    // claim
    let (status, _, body) = send(
        &router,
        "POST",
        "/api/events/1/holds",
        Some(hold_body(2, "session-x", 120)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["seatId"], 2);
    let hold_id = body["holdId"].as_str().unwrap().to_string();
    assert!(body["expiresAt"].is_string());

    // competing shopper loses
    let (status, _, body) = send(
        &router,
        "POST",
        "/api/events/1/holds",
        Some(hold_body(2, "session-y", 120)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["reason"], "unavailable");
    assert_eq!(body["status"], "HELD");

    // renew by owner / by stranger
    let (status, _, body) = send(
        &router,
        "PATCH",
        &format!("/api/holds/{hold_id}"),
        Some(json!({ "sessionId": "session-x", "ttlSeconds": 300 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["expiresAt"].is_string());

    let (status, _, body) = send(
        &router,
        "PATCH",
        &format!("/api/holds/{hold_id}"),
        Some(json!({ "sessionId": "session-y" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "not_owner");

    // release twice: both 204
    for _ in 0..2 {
        let (status, _, _) = send(
            &router,
            "DELETE",
            &format!("/api/holds/{hold_id}"),
            Some(json!({ "sessionId": "session-x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    // renewing a released hold reports it gone
    let (status, _, _) = send(
        &router,
        "PATCH",
        &format!("/api/holds/{hold_id}"),
        Some(json!({ "sessionId": "session-x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_cap_maps_to_429() {
    let router = test_app();
    open_event(&router, 1, 12).await;

    // default MAX_HOLDS_PER_SESSION is 10
    for seat in 1..=10 {
        let (status, _, _) = send(
            &router,
            "POST",
            "/api/events/1/holds",
            Some(hold_body(seat, "greedy", 120)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _, body) = send(
        &router,
        "POST",
        "/api/events/1/holds",
        Some(hold_body(11, "greedy", 120)),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["reason"], "hold_limit");
}

#[tokio::test]
async fn seat_snapshot_supports_etag_and_deltas() {
    let router = test_app();
    open_event(&router, 1, 3).await;

    let (status, headers, body) = send(&router, "GET", "/api/events/1/seats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full"], true);
    assert_eq!(body["seats"].as_array().unwrap().len(), 3);
    let version = body["version"].as_u64().unwrap();
    let etag = headers.get(header::ETAG).unwrap().to_str().unwrap().to_string();

    // unchanged: conditional poll is a 304
    let (status, _, _) = send_with_headers(
        &router,
        "GET",
        "/api/events/1/seats",
        None,
        &[("if-none-match", etag.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_MODIFIED);

    // a transition invalidates the tag and shows up as a delta
    let (status, _, _) = send(
        &router,
        "POST",
        "/api/events/1/holds",
        Some(hold_body(2, "s", 120)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = send(
        &router,
        "GET",
        &format!("/api/events/1/seats?since={version}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full"], false);
    let changes = body["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["seatId"], 2);
    assert_eq!(changes[0]["status"], "HELD");

    // unknown event
    let (status, _, _) = send(&router, "GET", "/api/events/9/seats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn conversion_marks_the_seat_sold() {
    let router = test_app();
    open_event(&router, 1, 2).await;

    let (_, _, body) = send(
        &router,
        "POST",
        "/api/events/1/holds",
        Some(hold_body(1, "buyer", 120)),
    )
    .await;
    let hold_id = body["holdId"].as_str().unwrap().to_string();

    let (status, _, body) = send(
        &router,
        "POST",
        &format!("/api/holds/{hold_id}/convert"),
        Some(json!({ "saleRef": "order-1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SOLD");

    let (_, _, body) = send(&router, "GET", "/api/events/1/seats", None).await;
    let seats = body["seats"].as_array().unwrap();
    let seat = seats.iter().find(|s| s["id"] == 1).unwrap();
    assert_eq!(seat["status"], "SOLD");
    assert_eq!(seat["saleRef"], "order-1234");

    // sold seats stay sold
    let (status, _, body) = send(
        &router,
        "POST",
        "/api/events/1/holds",
        Some(hold_body(1, "latecomer", 120)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "SOLD");
}

#[tokio::test]
async fn closing_an_event_tears_down_its_state() {
    let router = test_app();
    open_event(&router, 1, 2).await;

    let (status, _, _) = send(&router, "DELETE", "/api/events/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&router, "GET", "/api/events/1/seats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&router, "DELETE", "/api/events/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
