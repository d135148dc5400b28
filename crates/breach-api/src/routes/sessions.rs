//! Routes for the Scenario Progression bounded context.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use breach_core::error::DomainError;
use breach_core::repository::StoredEvent;
use breach_narrative::application::command_handlers::{self, SessionCommandResult};
use breach_narrative::application::query_handlers::{
    self, SessionExport, SessionReport, SessionView,
};
use breach_narrative::domain::commands;
use breach_narrative::domain::compliance::LearnerFeedback;
use breach_narrative::domain::events::DisplayEvent;
use breach_narrative::domain::state::OversightAction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

/// Request body for POST /sessions/{id}/choices.
#[derive(Debug, Deserialize)]
pub struct SubmitChoiceRequest {
    /// The choice to submit for the current scenario.
    pub choice_id: String,
}

/// Request body for POST /sessions/{id}/oversight.
#[derive(Debug, Deserialize)]
pub struct OversightRequest {
    /// The oversight control used.
    pub action: OversightAction,
}

/// Response body for POST /sessions.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    /// The new session's identifier.
    pub session_id: Uuid,
}

/// Response body returned after a session command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The session the command ran against.
    pub session_id: Uuid,
    /// Display events produced, in emission order.
    pub events: Vec<DisplayEvent>,
}

impl From<SessionCommandResult> for CommandResponse {
    fn from(result: SessionCommandResult) -> Self {
        Self {
            session_id: result.session_id,
            events: result.events,
        }
    }
}

/// POST /sessions
#[instrument(skip(state))]
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let session_id =
        command_handlers::handle_create_session(state.catalog.clone(), &state.registry)?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

/// POST /sessions/{id}/start
#[instrument(skip(state))]
async fn start_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let result = command_handlers::handle_start_session(
        &command,
        state.clock.as_ref(),
        &state.registry,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /sessions/{id}/choices
#[instrument(skip(state, request), fields(choice_id = %request.choice_id))]
async fn submit_choice(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    ApiJson(request): ApiJson<SubmitChoiceRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SubmitChoice {
        correlation_id: Uuid::new_v4(),
        session_id,
        choice_id: request.choice_id,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_choice command");

    let result = command_handlers::handle_submit_choice(
        &command,
        state.clock.as_ref(),
        &state.registry,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /sessions/{id}/oversight
#[instrument(skip(state, request), fields(action = ?request.action))]
async fn record_oversight_action(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    ApiJson(request): ApiJson<OversightRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RecordOversightAction {
        correlation_id: Uuid::new_v4(),
        session_id,
        action: request.action,
    };

    info!(correlation_id = %command.correlation_id, "handling record_oversight_action command");

    let result = command_handlers::handle_record_oversight_action(
        &command,
        state.clock.as_ref(),
        &state.registry,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /sessions/{id}/reset
#[instrument(skip(state))]
async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ResetSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling reset_session command");

    let result = command_handlers::handle_reset_session(
        &command,
        state.clock.as_ref(),
        &state.registry,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /sessions/{id}/disclaimer
#[instrument(skip(state))]
async fn accept_disclaimer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AcceptDisclaimer {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling accept_disclaimer command");

    let result = command_handlers::handle_accept_disclaimer(
        &command,
        state.clock.as_ref(),
        &state.registry,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /sessions/{id}/feedback
#[instrument(skip(state, feedback), fields(feedback_type = feedback.kind()))]
async fn submit_feedback(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    ApiJson(feedback): ApiJson<LearnerFeedback>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SubmitFeedback {
        correlation_id: Uuid::new_v4(),
        session_id,
        feedback,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_feedback command");

    let result = command_handlers::handle_submit_feedback(
        &command,
        state.clock.as_ref(),
        &state.registry,
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// DELETE /sessions/{id}
#[instrument(skip(state))]
async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionReport>, ApiError> {
    let command = commands::EndSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling end_session command");

    let report = command_handlers::handle_end_session(
        &command,
        state.clock.as_ref(),
        &state.registry,
        &*state.event_repository,
        &*state.settings,
    )
    .await?;

    Ok(Json(report))
}

/// GET /sessions/{id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(query_handlers::get_session_by_id(
        session_id,
        &state.registry,
    )?))
}

/// GET /sessions/{id}/report
#[instrument(skip(state))]
async fn get_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionReport>, ApiError> {
    Ok(Json(query_handlers::get_session_report(
        session_id,
        &state.registry,
        state.clock.as_ref(),
    )?))
}

/// GET /sessions/{id}/export
#[instrument(skip(state))]
async fn get_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionExport>, ApiError> {
    let export = query_handlers::get_session_export(
        session_id,
        &state.registry,
        &*state.event_repository,
        state.clock.as_ref(),
    )
    .await?;
    Ok(Json(export))
}

/// GET /sessions/{id}/events
#[instrument(skip(state))]
async fn get_events(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<StoredEvent>>, ApiError> {
    let events =
        query_handlers::get_session_events(session_id, &state.registry, &*state.event_repository)
            .await?;
    Ok(Json(events))
}

/// GET /sessions/{id}/settings
#[instrument(skip(state))]
async fn get_settings(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<BTreeMap<String, Value>>, ApiError> {
    ensure_session(&state, session_id)?;
    Ok(Json(state.settings.get_all(session_id).await?))
}

/// GET /sessions/{id}/settings/{key}
#[instrument(skip(state))]
async fn get_setting(
    State(state): State<AppState>,
    Path((session_id, key)): Path<(Uuid, String)>,
) -> Result<Json<Value>, ApiError> {
    ensure_session(&state, session_id)?;
    let value = state
        .settings
        .get(session_id, &key)
        .await?
        .ok_or(DomainError::SettingNotFound { session_id, key })?;
    Ok(Json(value))
}

/// PUT /sessions/{id}/settings/{key}
#[instrument(skip(state, value))]
async fn put_setting(
    State(state): State<AppState>,
    Path((session_id, key)): Path<(Uuid, String)>,
    ApiJson(value): ApiJson<Value>,
) -> Result<StatusCode, ApiError> {
    ensure_session(&state, session_id)?;
    state.settings.set(session_id, &key, value).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn ensure_session(state: &AppState, session_id: Uuid) -> Result<(), DomainError> {
    if state.registry.contains(session_id)? {
        Ok(())
    } else {
        Err(DomainError::SessionNotFound(session_id))
    }
}

/// Returns the router for the progression context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/start", post(start_session))
        .route("/sessions/{id}/choices", post(submit_choice))
        .route("/sessions/{id}/oversight", post(record_oversight_action))
        .route("/sessions/{id}/reset", post(reset_session))
        .route("/sessions/{id}/disclaimer", post(accept_disclaimer))
        .route("/sessions/{id}/feedback", post(submit_feedback))
        .route("/sessions/{id}/report", get(get_report))
        .route("/sessions/{id}/events", get(get_events))
        .route("/sessions/{id}/export", get(get_export))
        .route("/sessions/{id}/settings", get(get_settings))
        .route(
            "/sessions/{id}/settings/{key}",
            get(get_setting).put(put_setting),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use breach_core::clock::Clock;
    use breach_core::repository::{EventRepository, SettingsStore};
    use breach_store::{InMemoryEventRepository, InMemorySettingsStore};
    use breach_test_support::{
        FailingEventRepository, FixedClock, RecordingRelay, fixed_now, fixture_catalog,
    };
    use tower::ServiceExt;

    fn app_state_with(event_repository: Arc<dyn EventRepository>) -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
        AppState::new(
            Arc::new(fixture_catalog()),
            clock,
            event_repository,
            Arc::new(InMemorySettingsStore::new()),
            Arc::new(RecordingRelay::new("unused")),
        )
    }

    fn test_app_state() -> AppState {
        app_state_with(Arc::new(InMemoryEventRepository::new()))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_create_session_returns_201_with_id() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());

        // Act
        let (status, json) = send(app, "POST", "/sessions", None).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        let session_id: Uuid = json["session_id"].as_str().unwrap().parse().unwrap();
        assert!(state.registry.contains(session_id).unwrap());
    }

    #[tokio::test]
    async fn test_start_unknown_session_returns_404() {
        let app = router().with_state(test_app_state());

        let (status, json) = send(
            app,
            "POST",
            &format!("/sessions/{}/start", Uuid::new_v4()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "session_not_found");
    }

    #[tokio::test]
    async fn test_start_returns_500_when_repository_fails() {
        // Arrange
        let state = app_state_with(Arc::new(FailingEventRepository));
        let session_id = state.registry.create(state.catalog.clone()).unwrap();
        let app = router().with_state(state);

        // Act
        let (status, json) =
            send(app, "POST", &format!("/sessions/{session_id}/start"), None).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_submit_choice_returns_422_for_missing_body_field() {
        let state = test_app_state();
        let session_id = state.registry.create(state.catalog.clone()).unwrap();
        let app = router().with_state(state);

        let (status, json) = send(
            app,
            "POST",
            &format!("/sessions/{session_id}/choices"),
            Some(serde_json::json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "invalid_body");
        assert!(json["message"].as_str().unwrap().contains("choice_id"));
    }

    #[tokio::test]
    async fn test_submit_choice_without_content_type_returns_415_json() {
        let state = test_app_state();
        let session_id = state.registry.create(state.catalog.clone()).unwrap();
        let app = router().with_state(state);
        let request = Request::builder()
            .method("POST")
            .uri(format!("/sessions/{session_id}/choices"))
            .body(Body::from(r#"{"choice_id":"pause_review"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["error"], "invalid_body");
    }

    #[tokio::test]
    async fn test_end_session_removes_session_and_its_stores() {
        // Arrange
        let state = test_app_state();
        let session_id = state.registry.create(state.catalog.clone()).unwrap();
        state
            .settings
            .set(session_id, "sound", serde_json::json!(true))
            .await
            .unwrap();
        let (status, _) = send(
            router().with_state(state.clone()),
            "POST",
            &format!("/sessions/{session_id}/start"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Act
        let (status, report) = send(
            router().with_state(state.clone()),
            "DELETE",
            &format!("/sessions/{session_id}"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["session_id"], session_id.to_string());
        assert_eq!(report["phase"], "in_progress");
        assert!(!state.registry.contains(session_id).unwrap());
        assert!(
            state
                .event_repository
                .load_events(session_id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(state.settings.get_all(session_id).await.unwrap().is_empty());

        let (status, json) = send(
            router().with_state(state),
            "DELETE",
            &format!("/sessions/{session_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "session_not_found");
    }

    #[tokio::test]
    async fn test_get_setting_returns_value_or_404() {
        let state = test_app_state();
        let session_id = state.registry.create(state.catalog.clone()).unwrap();
        state
            .settings
            .set(session_id, "theme", serde_json::json!("amber"))
            .await
            .unwrap();

        let (status, json) = send(
            router().with_state(state.clone()),
            "GET",
            &format!("/sessions/{session_id}/settings/theme"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, "amber");

        let (status, json) = send(
            router().with_state(state),
            "GET",
            &format!("/sessions/{session_id}/settings/volume"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "setting_not_found");
    }

    #[tokio::test]
    async fn test_put_setting_unknown_session_returns_404() {
        let app = router().with_state(test_app_state());

        let (status, json) = send(
            app,
            "PUT",
            &format!("/sessions/{}/settings/sound", Uuid::new_v4()),
            Some(serde_json::json!(true)),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "session_not_found");
    }
}
