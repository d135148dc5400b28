//! Storage abstractions for the per-session event log and settings map.
//!
//! The engine treats both as opaque blob stores; durability is best effort.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a domain event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Session this event belongs to.
    pub session_id: Uuid,
    /// Event type name.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Sequence number within the session stream.
    pub sequence_number: i64,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Append-only event log keyed by session.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Load the retained events for a session, oldest first.
    async fn load_events(&self, session_id: Uuid) -> Result<Vec<StoredEvent>, DomainError>;

    /// Append events to a session's log.
    async fn append_events(
        &self,
        session_id: Uuid,
        events: &[StoredEvent],
    ) -> Result<(), DomainError>;

    /// Drop every retained event for a session. Returns how many were removed.
    async fn remove_events(&self, session_id: Uuid) -> Result<usize, DomainError>;
}

/// Flat key/value settings map keyed by session.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns a single setting, if present.
    async fn get(&self, session_id: Uuid, key: &str)
    -> Result<Option<serde_json::Value>, DomainError>;

    /// Inserts or replaces a setting.
    async fn set(
        &self,
        session_id: Uuid,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), DomainError>;

    /// Returns every setting stored for the session.
    async fn get_all(
        &self,
        session_id: Uuid,
    ) -> Result<BTreeMap<String, serde_json::Value>, DomainError>;

    /// Drops every setting stored for the session.
    async fn clear(&self, session_id: Uuid) -> Result<(), DomainError>;
}
