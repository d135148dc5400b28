//! Shared test mocks and fixtures for Breach Protocol.

mod catalog;
mod clock;
mod relay;
mod repository;

pub use catalog::{FIXTURE_CATALOG_YAML, fixture_catalog};
pub use clock::{FixedClock, fixed_now};
pub use relay::{FailingRelay, RecordingRelay};
pub use repository::{
    EmptyEventRepository, FailingEventRepository, RecordingEventRepository,
    RecordingSettingsStore,
};
