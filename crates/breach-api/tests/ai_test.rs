//! Integration tests for the relay endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use breach_relay::RelayError;
use breach_test_support::FailingRelay;
use serde_json::json;

#[tokio::test]
async fn test_relay_round_trip_returns_text() {
    let app = common::build_test_app(common::test_state());

    let (status, json) = common::post_json(
        app,
        "/api/ai",
        &json!({"user": "Recommend an action", "history": []}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "Standing by for human confirmation.");
}

#[tokio::test]
async fn test_relay_missing_user_returns_400() {
    let app = common::build_test_app(common::test_state());

    let (status, json) = common::post_json(app, "/api/ai", &json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing user input");
}

#[tokio::test]
async fn test_relay_non_json_upstream_returns_502_with_body() {
    let relay = FailingRelay(RelayError::NonJsonResponse {
        body: "<html>502 Bad Gateway</html>".to_owned(),
    });
    let app = common::build_test_app(common::test_state_with_relay(Arc::new(relay)));

    let (status, json) = common::post_json(app, "/api/ai", &json!({"user": "hello"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Upstream returned non-JSON response");
    assert_eq!(json["details"], "<html>502 Bad Gateway</html>");
}
