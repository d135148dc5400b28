//! Breach Protocol: in-memory persistence.
//!
//! Process-lifetime implementations of the core `EventRepository` and
//! `SettingsStore` traits. Nothing survives a restart.

pub mod memory_event_repository;
pub mod memory_settings_store;

pub use memory_event_repository::{InMemoryEventRepository, MAX_EVENTS_PER_SESSION};
pub use memory_settings_store::InMemorySettingsStore;
