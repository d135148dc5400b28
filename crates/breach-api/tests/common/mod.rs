//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use breach_content::domain::catalog::ScenarioCatalog;
use breach_core::clock::Clock;
use breach_relay::RelayService;
use breach_store::{InMemoryEventRepository, InMemorySettingsStore};
use breach_test_support::{FixedClock, RecordingRelay, fixed_now};
use http_body_util::BodyExt;
use tower::ServiceExt;

use breach_api::state::AppState;

/// Build application state over the built-in catalog with in-memory stores,
/// a fixed clock, and a canned relay.
pub fn test_state() -> AppState {
    test_state_with_relay(Arc::new(RecordingRelay::new("Standing by for human confirmation.")))
}

/// Same as [`test_state`] with a custom relay.
pub fn test_state_with_relay(relay: Arc<dyn RelayService>) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
    AppState::new(
        Arc::new(ScenarioCatalog::builtin().unwrap()),
        clock,
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(InMemorySettingsStore::new()),
        relay,
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
/// Clone the state first to issue several requests against one registry.
pub fn build_test_app(state: AppState) -> Router {
    breach_api::app(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Create a session and return its id.
pub async fn create_session(state: &AppState) -> String {
    let (status, json) = post_empty(build_test_app(state.clone()), "/api/v1/sessions").await;
    assert_eq!(status, StatusCode::CREATED);
    json["session_id"].as_str().unwrap().to_owned()
}
