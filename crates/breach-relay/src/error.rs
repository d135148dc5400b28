//! Relay error types.

use serde_json::Value;

/// Failures of a relay call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RelayError {
    /// The upstream could not be reached, timed out, or no API key is set.
    #[error("relay unavailable: {0}")]
    Unavailable(String),

    /// The upstream answered with something that is not JSON.
    #[error("upstream returned non-JSON response")]
    NonJsonResponse {
        /// The raw response body.
        body: String,
    },

    /// The upstream answered with an error payload.
    #[error("upstream error")]
    Upstream {
        /// The upstream `error` object.
        details: Value,
    },

    /// The upstream answered with JSON lacking a text content block.
    #[error("no valid content from upstream")]
    UnexpectedShape {
        /// The full upstream response.
        details: Value,
    },

    /// A relay setting could not be parsed.
    #[error("invalid relay configuration: {0}")]
    Config(String),
}
