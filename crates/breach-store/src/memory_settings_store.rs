//! In-memory implementation of the `SettingsStore` trait.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use breach_core::error::DomainError;
use breach_core::repository::SettingsStore;
use serde_json::Value;
use uuid::Uuid;

type Settings = HashMap<Uuid, BTreeMap<String, Value>>;

/// Flat per-session key/value map held in process memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    settings: Mutex<Settings>,
}

impl InMemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Settings>, DomainError> {
        self.settings
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("settings store poisoned: {e}")))
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, session_id: Uuid, key: &str) -> Result<Option<Value>, DomainError> {
        Ok(self
            .lock()?
            .get(&session_id)
            .and_then(|map| map.get(key))
            .cloned())
    }

    async fn set(&self, session_id: Uuid, key: &str, value: Value) -> Result<(), DomainError> {
        self.lock()?
            .entry(session_id)
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn get_all(&self, session_id: Uuid) -> Result<BTreeMap<String, Value>, DomainError> {
        Ok(self.lock()?.get(&session_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, session_id: Uuid) -> Result<(), DomainError> {
        self.lock()?.remove(&session_id);
        Ok(())
    }
}
