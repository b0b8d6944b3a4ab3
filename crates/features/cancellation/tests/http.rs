#![cfg(feature = "server")]

mod fixtures;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use fixtures::*;
use rcast_domain::config::ApiConfig;
use rcast_event_bus::EventBus;
use rcast_kernel::prelude::ApiState;
use rcast_push::SendFailure;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app(directory: FakeDirectory, transport: FakeTransport) -> Router {
    let events = EventBus::new();
    let slice =
        rcast_cancellation::init(Arc::new(directory), Arc::new(transport), events.clone())
            .expect("slice should initialize");

    let state = ApiState::builder()
        .config(ApiConfig::default())
        .events(events)
        .register_slice(slice)
        .build()
        .expect("state should build");

    let (router, _api) = rcast_cancellation::routes::router().split_for_parts();
    router.with_state(state)
}

async fn post_acceptance(app: Router, payload: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/calls/accepted")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build");

    let response = app.oneshot(request).await.expect("handler should answer");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).expect("body should be JSON");

    (status, body)
}

fn valid_payload() -> Value {
    json!({
        "userId": "u1",
        "acceptedDeviceId": "d1",
        "channel": "c-1",
        "token": "sess-1",
    })
}

#[tokio::test]
async fn completed_dispatch_returns_counts() {
    let directory = FakeDirectory::with_devices(vec![
        device("d1", Some("tokenA")),
        device("d2", Some("tokenB")),
        device("d3", None),
    ]);
    let app = app(directory, FakeTransport::deliver_all());

    let (status, body) = post_acceptance(app, &valid_payload()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cancellation dispatched.");
    assert_eq!(body["successCount"], 1);
    assert_eq!(body["failureCount"], 0);
}

#[tokio::test]
async fn no_other_devices_returns_the_quiet_message() {
    let app = app(FakeDirectory::empty(), FakeTransport::deliver_all());

    let (status, body) = post_acceptance(app, &valid_payload()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No other devices to notify.");
    assert!(body.get("successCount").is_none());
    assert!(body.get("failureCount").is_none());
}

#[tokio::test]
async fn partial_failure_is_still_http_ok() {
    let directory = FakeDirectory::with_devices(vec![
        device("d1", Some("tokenA")),
        device("d2", Some("tokenB")),
    ]);
    let app = app(directory, FakeTransport::scripted(vec![failed(SendFailure::TokenInvalid)]));

    let (status, body) = post_acceptance(app, &valid_payload()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["successCount"], 0);
    assert_eq!(body["failureCount"], 1);
}

#[tokio::test]
async fn missing_field_is_a_client_error_and_nothing_is_called() {
    let directory = FakeDirectory::empty();
    let transport = FakeTransport::deliver_all();

    // Keep handles to check interactions after the call.
    let events = EventBus::new();
    let directory = Arc::new(directory);
    let transport = Arc::new(transport);
    let slice = rcast_cancellation::init(directory.clone(), transport.clone(), events.clone())
        .expect("slice should initialize");
    let state = ApiState::builder()
        .config(ApiConfig::default())
        .events(events)
        .register_slice(slice)
        .build()
        .expect("state should build");
    let (router, _api) = rcast_cancellation::routes::router().split_for_parts();
    let app = router.with_state(state);

    for missing in ["userId", "acceptedDeviceId", "channel", "token"] {
        let mut payload = valid_payload();
        payload.as_object_mut().expect("payload is an object").remove(missing);

        let (status, body) = post_acceptance(app.clone(), &payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {missing}");
        let error = body["error"].as_str().expect("error message");
        assert!(error.contains(missing), "error should name {missing}: {error}");
    }

    assert_eq!(directory.calls(), 0);
    assert_eq!(transport.invocations(), 0);
}

#[tokio::test]
async fn empty_field_is_a_client_error() {
    let app = app(FakeDirectory::empty(), FakeTransport::deliver_all());

    let mut payload = valid_payload();
    payload["channel"] = json!("");

    let (status, body) = post_acceptance(app, &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error message").contains("channel"));
}

#[tokio::test]
async fn registry_outage_is_a_server_error() {
    let app = app(FakeDirectory::failing(), FakeTransport::deliver_all());

    let (status, body) = post_acceptance(app, &valid_payload()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().expect("error message").contains("registry"));
}

#[tokio::test]
async fn transport_outage_is_a_server_error() {
    let directory = FakeDirectory::with_devices(vec![
        device("d1", Some("tokenA")),
        device("d2", Some("tokenB")),
    ]);
    let app = app(directory, FakeTransport::failing());

    let (status, body) = post_acceptance(app, &valid_payload()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().expect("error message").contains("transport"));
}
