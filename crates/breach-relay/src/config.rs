//! Relay configuration read from the environment.

use std::time::Duration;

use crate::error::RelayError;

/// Default upstream endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Default reply budget.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Default upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default system prompt framing the assistant for the learner.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the simulated AI system in Breach Protocol, \
an interactive lesson on AI safety and human oversight. Stay in character as a capable but \
imperfect decision-support system. When the learner asks you to act, explain your reasoning, \
point out the risks of your own recommendation, and defer to human confirmation before any \
irreversible step. Keep replies under 150 words.";

/// Settings for [`crate::AnthropicRelay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Upstream API key. Relay calls fail as unavailable without one.
    pub api_key: Option<String>,
    /// Upstream base URL, without a trailing slash.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Maximum reply tokens.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// System prompt sent with every request.
    pub system_prompt: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
        }
    }
}

impl RelayConfig {
    /// Reads `ANTHROPIC_API_KEY`, `RELAY_BASE_URL`, `RELAY_MODEL`,
    /// `RELAY_MAX_TOKENS`, `RELAY_TIMEOUT_SECS`, and `RELAY_SYSTEM_PROMPT`.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Config` if a numeric setting does not parse.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RelayConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Config` if a numeric setting does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_tokens = match non_blank("RELAY_MAX_TOKENS") {
            Some(raw) => raw.trim().parse().map_err(|e| {
                RelayError::Config(format!("RELAY_MAX_TOKENS must be a positive integer: {e}"))
            })?,
            None => defaults.max_tokens,
        };
        let timeout = match non_blank("RELAY_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|e| {
                RelayError::Config(format!("RELAY_TIMEOUT_SECS must be a whole number: {e}"))
            })?),
            None => defaults.timeout,
        };

        Ok(Self {
            api_key: non_blank("ANTHROPIC_API_KEY"),
            base_url: non_blank("RELAY_BASE_URL")
                .map_or(defaults.base_url, |url| url.trim_end_matches('/').to_owned()),
            model: non_blank("RELAY_MODEL").unwrap_or(defaults.model),
            max_tokens,
            timeout,
            system_prompt: non_blank("RELAY_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, RelayConfig::default());
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_overrides_are_read() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("RELAY_BASE_URL", "http://localhost:9000/"),
            ("RELAY_MAX_TOKENS", "512"),
            ("RELAY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = RelayConfig::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "  ")])).unwrap();

        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_max_tokens_is_config_error() {
        let result = RelayConfig::from_lookup(lookup(&[("RELAY_MAX_TOKENS", "lots")]));

        assert!(matches!(result, Err(RelayError::Config(msg)) if msg.contains("RELAY_MAX_TOKENS")));
    }
}
