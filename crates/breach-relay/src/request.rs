//! Relay request types and the service seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// One prior conversation turn, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    /// `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A learner message plus the conversation so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// The new learner message. Never blank.
    pub user: String,
    /// Prior turns, oldest first.
    pub history: Vec<RelayMessage>,
}

impl RelayRequest {
    /// Messages to send upstream: the history followed by the new user turn.
    #[must_use]
    pub fn into_messages(self) -> Vec<RelayMessage> {
        let mut messages = self.history;
        messages.push(RelayMessage {
            role: "user".to_owned(),
            content: self.user,
        });
        messages
    }
}

/// Sends a request to a text-generation backend and returns the reply text.
#[async_trait]
pub trait RelayService: Send + Sync {
    /// Relays one request.
    async fn relay(&self, request: RelayRequest) -> Result<String, RelayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_messages_appends_user_turn_after_history() {
        let request = RelayRequest {
            user: "What now?".to_owned(),
            history: vec![
                RelayMessage {
                    role: "user".to_owned(),
                    content: "Status?".to_owned(),
                },
                RelayMessage {
                    role: "assistant".to_owned(),
                    content: "Holding.".to_owned(),
                },
            ],
        };

        let messages = request.into_messages();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[2].content, "What now?");
        assert_eq!(messages[0].content, "Status?");
    }
}
