//! `POST /api/ai`: relays a learner message to the upstream model.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use breach_relay::{RelayMessage, RelayRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::RelayApiError;
use crate::state::AppState;

/// Successful relay response.
#[derive(Debug, Serialize)]
pub struct AiResponse {
    /// The model's reply.
    pub text: String,
}

/// Reads `{user, history}` leniently: `user` must be a non-blank string,
/// while a `history` that is not an array is treated as empty and entries
/// that are not `{role, content}` are skipped.
fn relay_request_from(body: &Value) -> Result<RelayRequest, RelayApiError> {
    let user = body
        .get("user")
        .and_then(Value::as_str)
        .filter(|u| !u.trim().is_empty())
        .ok_or(RelayApiError::MissingUserInput)?;

    let entries = body
        .get("history")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let history: Vec<RelayMessage> = entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect();
    if history.len() < entries.len() {
        debug!(
            skipped = entries.len() - history.len(),
            "ignoring malformed history entries"
        );
    }

    Ok(RelayRequest {
        user: user.to_owned(),
        history,
    })
}

/// POST /api/ai
#[instrument(skip_all)]
async fn relay(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AiResponse>, RelayApiError> {
    let Json(body) = body?;
    let request = relay_request_from(&body)?;
    debug!(history = request.history.len(), "relaying learner message");

    let text = state.relay.relay(request).await?;

    info!(reply_chars = text.chars().count(), "relay call succeeded");
    Ok(Json(AiResponse { text }))
}

/// Returns the relay router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/ai", post(relay))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use breach_core::clock::Clock;
    use breach_relay::{RelayError, RelayService};
    use breach_store::{InMemoryEventRepository, InMemorySettingsStore};
    use breach_test_support::{FailingRelay, FixedClock, RecordingRelay, fixed_now, fixture_catalog};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_state_with(relay: Arc<dyn RelayService>) -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
        AppState::new(
            Arc::new(fixture_catalog()),
            clock,
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemorySettingsStore::new()),
            relay,
        )
    }

    async fn post(app: Router, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ai")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_relay_returns_text_and_forwards_history() {
        // Arrange
        let relay = Arc::new(RecordingRelay::new("Awaiting human confirmation."));
        let app = router().with_state(app_state_with(relay.clone()));
        let body = json!({
            "user": "Deploy countermeasures",
            "history": [{"role": "assistant", "content": "Standing by."}]
        });

        // Act
        let (status, json) = post(app, &body).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "Awaiting human confirmation.");
        let requests = relay.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user, "Deploy countermeasures");
        assert_eq!(requests[0].history.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_user_returns_400() {
        let relay = Arc::new(RecordingRelay::new("unused"));
        let app = router().with_state(app_state_with(relay.clone()));

        let (status, json) = post(app, &json!({"history": []})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing user input");
        assert!(relay.requests().is_empty());
    }

    #[tokio::test]
    async fn test_blank_user_returns_400() {
        let app = router().with_state(app_state_with(Arc::new(RecordingRelay::new("unused"))));

        let (status, json) = post(app, &json!({"user": "   "})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing user input");
    }

    #[tokio::test]
    async fn test_non_array_history_is_treated_as_empty() {
        // Arrange
        let relay = Arc::new(RecordingRelay::new("Acknowledged."));
        let app = router().with_state(app_state_with(relay.clone()));

        // Act
        let (status, json) = post(app, &json!({"user": "hi", "history": "x"})).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], "Acknowledged.");
        assert!(relay.requests()[0].history.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_history_entries_are_skipped() {
        let relay = Arc::new(RecordingRelay::new("Acknowledged."));
        let app = router().with_state(app_state_with(relay.clone()));
        let body = json!({
            "user": "hi",
            "history": [42, {"role": "user", "content": "earlier"}, {"role": "user"}]
        });

        let (status, _) = post(app, &body).await;

        assert_eq!(status, StatusCode::OK);
        let history = &relay.requests()[0].history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "earlier");
    }

    #[tokio::test]
    async fn test_non_string_user_returns_400() {
        let relay = Arc::new(RecordingRelay::new("unused"));
        let app = router().with_state(app_state_with(relay.clone()));

        let (status, json) = post(app, &json!({"user": 42})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Missing user input");
        assert!(relay.requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_json_error_body() {
        let app = router().with_state(app_state_with(Arc::new(RecordingRelay::new("unused"))));
        let request = Request::builder()
            .method("POST")
            .uri("/api/ai")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["error"], "Invalid request body");
        assert!(json["details"].is_string());
    }

    #[tokio::test]
    async fn test_upstream_error_returns_502_with_details() {
        let failing = FailingRelay(RelayError::Upstream {
            details: json!({"type": "authentication_error"}),
        });
        let app = router().with_state(app_state_with(Arc::new(failing)));

        let (status, json) = post(app, &json!({"user": "hello"})).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["details"]["type"], "authentication_error");
    }

    #[tokio::test]
    async fn test_unexpected_shape_returns_500() {
        let failing = FailingRelay(RelayError::UnexpectedShape {
            details: json!({"content": []}),
        });
        let app = router().with_state(app_state_with(Arc::new(failing)));

        let (status, json) = post(app, &json!({"user": "hello"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "No valid content from upstream");
    }

    #[tokio::test]
    async fn test_unavailable_relay_returns_502() {
        let failing = FailingRelay(RelayError::Unavailable("timed out".to_owned()));
        let app = router().with_state(app_state_with(Arc::new(failing)));

        let (status, _) = post(app, &json!({"user": "hello"})).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
