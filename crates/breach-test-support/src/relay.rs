//! Test relays: canned `RelayService` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use breach_relay::{RelayError, RelayRequest, RelayService};

/// A relay that answers every request with the same text and records what
/// it was asked.
#[derive(Debug)]
pub struct RecordingRelay {
    reply: String,
    requests: Mutex<Vec<RelayRequest>>,
}

impl RecordingRelay {
    /// Create a relay that always replies with `reply`.
    #[must_use]
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request received, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<RelayRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayService for RecordingRelay {
    async fn relay(&self, request: RelayRequest) -> Result<String, RelayError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.reply.clone())
    }
}

/// A relay that fails every request with the configured error.
#[derive(Debug)]
pub struct FailingRelay(pub RelayError);

#[async_trait]
impl RelayService for FailingRelay {
    async fn relay(&self, _request: RelayRequest) -> Result<String, RelayError> {
        Err(self.0.clone())
    }
}
