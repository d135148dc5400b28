//! Shared application state.

use std::sync::Arc;

use breach_content::domain::catalog::ScenarioCatalog;
use breach_core::clock::Clock;
use breach_core::repository::{EventRepository, SettingsStore};
use breach_narrative::application::registry::SessionRegistry;
use breach_relay::RelayService;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The validated scenario catalog, shared by every session.
    pub catalog: Arc<ScenarioCatalog>,
    /// Live sessions.
    pub registry: Arc<SessionRegistry>,
    /// Clock for event timestamps.
    pub clock: Arc<dyn Clock>,
    /// Per-session event log.
    pub event_repository: Arc<dyn EventRepository>,
    /// Per-session settings map.
    pub settings: Arc<dyn SettingsStore>,
    /// Upstream text-generation relay.
    pub relay: Arc<dyn RelayService>,
}

impl AppState {
    /// Create new application state with an empty session registry.
    #[must_use]
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        settings: Arc<dyn SettingsStore>,
        relay: Arc<dyn RelayService>,
    ) -> Self {
        Self {
            catalog,
            registry: Arc::new(SessionRegistry::new()),
            clock,
            event_repository,
            settings,
            relay,
        }
    }
}
