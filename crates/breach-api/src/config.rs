//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use breach_relay::RelayConfig;

use crate::error::AppError;

/// Startup settings for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Optional YAML catalog replacing the built-in scenarios.
    pub catalog_path: Option<PathBuf>,
    /// Upstream relay settings.
    pub relay: RelayConfig,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `SCENARIO_CATALOG_PATH`, and the relay variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let catalog_path = lookup("SCENARIO_CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let relay = RelayConfig::from_lookup(&lookup).map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            host,
            port,
            catalog_path,
            relay,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
