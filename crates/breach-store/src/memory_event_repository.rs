//! In-memory implementation of the `EventRepository` trait.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use breach_core::error::DomainError;
use breach_core::repository::{EventRepository, StoredEvent};
use tracing::debug;
use uuid::Uuid;

/// Entries retained per session. Older entries are dropped first.
pub const MAX_EVENTS_PER_SESSION: usize = 1000;

type Logs = HashMap<Uuid, VecDeque<StoredEvent>>;

/// Bounded, per-session event log held in process memory.
#[derive(Debug)]
pub struct InMemoryEventRepository {
    capacity: usize,
    logs: Mutex<Logs>,
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::with_capacity(MAX_EVENTS_PER_SESSION)
    }
}

impl InMemoryEventRepository {
    /// Creates a repository retaining [`MAX_EVENTS_PER_SESSION`] entries per
    /// session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository retaining at most `capacity` entries per session.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            logs: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Logs>, DomainError> {
        self.logs
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("event log poisoned: {e}")))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, session_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self
            .lock()?
            .get(&session_id)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn append_events(
        &self,
        session_id: Uuid,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut logs = self.lock()?;
        let log = logs.entry(session_id).or_default();
        log.extend(events.iter().cloned());

        let overflow = log.len().saturating_sub(self.capacity);
        if overflow > 0 {
            log.drain(..overflow);
            debug!(%session_id, dropped = overflow, "trimmed session event log");
        }
        Ok(())
    }

    async fn remove_events(&self, session_id: Uuid) -> Result<usize, DomainError> {
        let removed = self.lock()?.remove(&session_id).map_or(0, |log| log.len());
        debug!(%session_id, removed, "dropped session event log");
        Ok(removed)
    }
}
