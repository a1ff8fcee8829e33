//! Router-level tests using tower's oneshot, no sockets involved.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use http_body_util::BodyExt;
use mock_server::{app, Envelope, ErrorBody};
use tower::ServiceExt;

async fn send(uri: &str, api_key: Option<&str>) -> (StatusCode, Bytes) {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    let request = builder.body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

fn error_message(body: &Bytes) -> String {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap();
    assert_eq!(parsed.status, "error");
    parsed.error
}

#[tokio::test]
async fn missing_api_key_is_unauthorized() {
    let (status, body) = send("/v1/menstrualcycle?last_period=2024-01-01", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "Missing or invalid API key");
}

#[tokio::test]
async fn empty_api_key_is_unauthorized() {
    let (status, _) = send("/v1/menstrualcycle?last_period=2024-01-01", Some("")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn defaults_apply_when_optional_params_are_absent() {
    let (status, body) = send("/v1/menstrualcycle?last_period=2024-01-01", Some("key")).await;
    assert_eq!(status, StatusCode::OK);

    let envelope: Envelope = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope.status, "ok");
    assert_eq!(envelope.error, None);
    assert_eq!(envelope.data.last_period_date, "2024-01-01");
    assert_eq!(envelope.data.cycle_length, 28);
    assert_eq!(envelope.data.period_length, 5);
    assert_eq!(envelope.data.cycles.len(), 3);
}

#[tokio::test]
async fn explicit_params_are_honored() {
    let (status, body) = send(
        "/v1/menstrualcycle?last_period=2024-01-01&cycle_length=30&period_length=6&cycles=6",
        Some("key"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let envelope: Envelope = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope.data.cycle_length, 30);
    assert_eq!(envelope.data.period_length, 6);
    assert_eq!(envelope.data.cycles.len(), 6);
    assert_eq!(envelope.data.cycles[0].period.start_date, "2024-01-31");
}

#[tokio::test]
async fn missing_last_period_is_bad_request() {
    let (status, body) = send("/v1/menstrualcycle", Some("key")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Required parameter [last_period] is missing"
    );
}

#[tokio::test]
async fn impossible_calendar_date_is_bad_request() {
    let (status, body) = send("/v1/menstrualcycle?last_period=2024-99-99", Some("key")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Parameter [last_period] must be a valid date"
    );
}

#[tokio::test]
async fn out_of_range_cycle_length_is_bad_request() {
    let (status, body) = send(
        "/v1/menstrualcycle?last_period=2024-01-01&cycle_length=50",
        Some("key"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Parameter [cycle_length] must be at most 35"
    );
}

#[tokio::test]
async fn non_numeric_cycles_is_bad_request() {
    let (status, body) = send(
        "/v1/menstrualcycle?last_period=2024-01-01&cycles=lots",
        Some("key"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Parameter [cycles] must be a valid integer"
    );
}
