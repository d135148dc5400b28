//! Breach Protocol: upstream text-generation relay.
//!
//! Forwards a learner's message, plus prior turns, to the Anthropic Messages
//! API and extracts the first text block of the reply.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod request;

pub use anthropic::AnthropicRelay;
pub use config::RelayConfig;
pub use error::RelayError;
pub use request::{RelayMessage, RelayRequest, RelayService};
