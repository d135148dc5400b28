//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

/// Source of timestamps for choice logs and event metadata. Tests inject a
/// fixed implementation so recorded times are reproducible.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
