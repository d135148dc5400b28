//! Relay backed by the Anthropic Messages API.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::request::{RelayMessage, RelayRequest, RelayService};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RelayMessage>,
}

/// Relays requests to `POST {base_url}/v1/messages`.
#[derive(Debug, Clone)]
pub struct AnthropicRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl AnthropicRelay {
    /// Builds a relay with an HTTP client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Config` if the HTTP client cannot be built.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

#[async_trait]
impl RelayService for AnthropicRelay {
    async fn relay(&self, request: RelayRequest) -> Result<String, RelayError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(RelayError::Unavailable(
                "ANTHROPIC_API_KEY is not set".to_owned(),
            ));
        };

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: &self.config.system_prompt,
            messages: request.into_messages(),
        };
        let url = format!("{}/v1/messages", self.config.base_url);
        debug!(%url, messages = body.messages.len(), "relaying to upstream");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "upstream request failed");
                RelayError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::Unavailable(e.to_string()))?;
        debug!(%status, bytes = text.len(), "upstream responded");

        parse_response(&text)
    }
}

/// Extracts the reply text from an upstream response body.
///
/// # Errors
///
/// Returns `NonJsonResponse` if the body does not parse, `Upstream` if it
/// carries an `error`, and `UnexpectedShape` if there is no leading text block.
pub fn parse_response(body: &str) -> Result<String, RelayError> {
    let data: Value = serde_json::from_str(body).map_err(|_| RelayError::NonJsonResponse {
        body: body.to_owned(),
    })?;

    if let Some(error) = data.get("error").filter(|e| !e.is_null()) {
        return Err(RelayError::Upstream {
            details: error.clone(),
        });
    }

    match data.pointer("/content/0/text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Ok(text.to_owned()),
        _ => Err(RelayError::UnexpectedShape { details: data }),
    }
}
