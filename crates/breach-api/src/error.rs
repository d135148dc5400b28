//! Breach Protocol: API error types.

use axum::Json;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use breach_core::error::DomainError;
use breach_relay::RelayError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scenario catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] DomainError),

    /// Telemetry pipeline setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error for the session and catalog routes.
#[derive(Debug)]
pub enum ApiError {
    /// A domain operation failed.
    Domain(DomainError),
    /// The request body was not the expected JSON.
    InvalidBody(JsonRejection),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::Domain(err) => {
                let (status, code) = match &err {
                    DomainError::SessionNotFound(_) => {
                        (StatusCode::NOT_FOUND, "session_not_found")
                    }
                    DomainError::SettingNotFound { .. } => {
                        (StatusCode::NOT_FOUND, "setting_not_found")
                    }
                    DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                    DomainError::UnknownChoice { .. } => {
                        (StatusCode::BAD_REQUEST, "unknown_choice")
                    }
                    DomainError::InvalidState { .. } => (StatusCode::CONFLICT, "invalid_state"),
                    DomainError::Infrastructure(_) => {
                        error!(error = %err, "infrastructure failure");
                        (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
                    }
                };
                (status, code, err.to_string())
            }
            Self::InvalidBody(rejection) => {
                (rejection.status(), "invalid_body", rejection.body_text())
            }
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejection is an [`ApiError`], so malformed bodies
/// get the same `{error, message}` shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// JSON body returned by the relay endpoint on failure.
#[derive(Debug, Serialize)]
pub struct RelayErrorBody {
    /// Human-readable summary.
    pub error: String,
    /// Upstream payload or raw body, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Failures of `POST /api/ai`.
#[derive(Debug)]
pub enum RelayApiError {
    /// The request had no usable `user` field.
    MissingUserInput,
    /// The request body was not JSON.
    InvalidBody(JsonRejection),
    /// The relay call failed.
    Relay(RelayError),
}

impl From<JsonRejection> for RelayApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl From<RelayError> for RelayApiError {
    fn from(err: RelayError) -> Self {
        Self::Relay(err)
    }
}

impl IntoResponse for RelayApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            Self::MissingUserInput => (StatusCode::BAD_REQUEST, "Missing user input".to_owned(), None),
            Self::InvalidBody(rejection) => (
                rejection.status(),
                "Invalid request body".to_owned(),
                Some(Value::String(rejection.body_text())),
            ),
            Self::Relay(err) => {
                warn!(error = %err, "relay call failed");
                match err {
                    RelayError::Unavailable(reason) => (
                        StatusCode::BAD_GATEWAY,
                        "Upstream relay unavailable".to_owned(),
                        Some(Value::String(reason)),
                    ),
                    RelayError::NonJsonResponse { body } => (
                        StatusCode::BAD_GATEWAY,
                        "Upstream returned non-JSON response".to_owned(),
                        Some(Value::String(body)),
                    ),
                    RelayError::Upstream { details } => (
                        StatusCode::BAD_GATEWAY,
                        "Upstream API error".to_owned(),
                        Some(details),
                    ),
                    RelayError::UnexpectedShape { details } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "No valid content from upstream".to_owned(),
                        Some(details),
                    ),
                    RelayError::Config(reason) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, reason, None)
                    }
                }
            }
        };

        (status, Json(RelayErrorBody { error, details })).into_response()
    }
}
