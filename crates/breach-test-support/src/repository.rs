//! Test repositories: mock `EventRepository` and `SettingsStore`
//! implementations for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use breach_core::error::DomainError;
use breach_core::repository::{EventRepository, SettingsStore, StoredEvent};
use serde_json::Value;
use uuid::Uuid;

/// An event repository that records every `append_events` call and replays
/// the appended events from `load_events`.
#[derive(Debug, Default)]
pub struct RecordingEventRepository {
    appended: Mutex<Vec<(Uuid, Vec<StoredEvent>)>>,
}

impl RecordingEventRepository {
    /// Create an empty recording repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every append call, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, session_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self
            .appended
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == session_id)
            .flat_map(|(_, events)| events.iter().cloned())
            .collect())
    }

    async fn append_events(
        &self,
        session_id: Uuid,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((session_id, events.to_vec()));
        Ok(())
    }

    async fn remove_events(&self, session_id: Uuid) -> Result<usize, DomainError> {
        let mut appended = self.appended.lock().unwrap();
        let removed = appended
            .iter()
            .filter(|(id, _)| *id == session_id)
            .map(|(_, events)| events.len())
            .sum();
        appended.retain(|(id, _)| *id != session_id);
        Ok(removed)
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _session_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _session_id: Uuid,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_events(&self, _session_id: Uuid) -> Result<usize, DomainError> {
        Ok(0)
    }
}

/// An event repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _session_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append_events(
        &self,
        _session_id: Uuid,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn remove_events(&self, _session_id: Uuid) -> Result<usize, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A settings store backed by a plain map that also counts `clear` calls.
#[derive(Debug, Default)]
pub struct RecordingSettingsStore {
    settings: Mutex<HashMap<Uuid, BTreeMap<String, Value>>>,
    cleared: Mutex<Vec<Uuid>>,
}

impl RecordingSettingsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions passed to `clear`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cleared_sessions(&self) -> Vec<Uuid> {
        self.cleared.lock().unwrap().clone()
    }
}

#[async_trait]
impl SettingsStore for RecordingSettingsStore {
    async fn get(&self, session_id: Uuid, key: &str) -> Result<Option<Value>, DomainError> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .get(&session_id)
            .and_then(|map| map.get(key))
            .cloned())
    }

    async fn set(&self, session_id: Uuid, key: &str, value: Value) -> Result<(), DomainError> {
        self.settings
            .lock()
            .unwrap()
            .entry(session_id)
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn get_all(&self, session_id: Uuid) -> Result<BTreeMap<String, Value>, DomainError> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self, session_id: Uuid) -> Result<(), DomainError> {
        self.settings.lock().unwrap().remove(&session_id);
        self.cleared.lock().unwrap().push(session_id);
        Ok(())
    }
}
