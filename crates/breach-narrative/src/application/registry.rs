//! In-memory registry of live progression engines.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use breach_content::domain::catalog::ScenarioCatalog;
use breach_core::error::DomainError;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::domain::engine::ProgressionEngine;

/// Serializes commands on one session, from the engine operation through
/// the event-log append.
pub type CommandLock = Arc<AsyncMutex<()>>;

#[derive(Debug)]
struct SessionEntry {
    engine: ProgressionEngine,
    command_lock: CommandLock,
}

type Sessions = HashMap<Uuid, SessionEntry>;

/// Owns every live session. Engines never leave the lock, so callers work on
/// them through [`SessionRegistry::with_session`] and must not hold the
/// result across an `.await`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<Sessions>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `NotStarted` session over `catalog` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn create(&self, catalog: Arc<ScenarioCatalog>) -> Result<Uuid, DomainError> {
        let session_id = Uuid::new_v4();
        self.lock()?.insert(
            session_id,
            SessionEntry {
                engine: ProgressionEngine::new(session_id, catalog),
                command_lock: CommandLock::default(),
            },
        );
        Ok(session_id)
    }

    /// Runs `f` against the session's engine while holding the lock.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` for an unknown id, or whatever
    /// `f` returns.
    pub fn with_session<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut ProgressionEngine) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut sessions = self.lock()?;
        let entry = sessions
            .get_mut(&session_id)
            .ok_or(DomainError::SessionNotFound(session_id))?;
        f(&mut entry.engine)
    }

    /// Returns the session's command lock. Hold it across the engine
    /// operation and the append so log order matches sequence order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotFound` for an unknown id.
    pub fn command_lock(&self, session_id: Uuid) -> Result<CommandLock, DomainError> {
        self.lock()?
            .get(&session_id)
            .map(|entry| Arc::clone(&entry.command_lock))
            .ok_or(DomainError::SessionNotFound(session_id))
    }

    /// Whether the session exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn contains(&self, session_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.lock()?.contains_key(&session_id))
    }

    /// Drops a session. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the registry lock is poisoned.
    pub fn remove(&self, session_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.lock()?.remove(&session_id).is_some())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Sessions>, DomainError> {
        self.sessions
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session registry poisoned: {e}")))
    }
}
