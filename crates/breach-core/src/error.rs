//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No session is registered under the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// The session has no setting under the given key.
    #[error("setting '{key}' not found for session {session_id}")]
    SettingNotFound {
        /// The session that was queried.
        session_id: Uuid,
        /// The missing key.
        key: String,
    },

    /// Authored content or request input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The submitted choice does not belong to the current scenario.
    #[error("unknown choice '{choice_id}' for scenario '{scenario_id}'")]
    UnknownChoice {
        /// The scenario the choice was submitted against.
        scenario_id: String,
        /// The rejected choice identifier.
        choice_id: String,
    },

    /// An operation was called in a session phase that does not allow it.
    #[error("invalid state: cannot {operation} while session is {phase}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The phase the session was in.
        phase: String,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_choice_message_names_scenario_and_choice() {
        let err = DomainError::UnknownChoice {
            scenario_id: "intro_oversight".to_owned(),
            choice_id: "launch".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "unknown choice 'launch' for scenario 'intro_oversight'"
        );
    }

    #[test]
    fn test_setting_not_found_message_names_key() {
        let session_id = Uuid::nil();
        let err = DomainError::SettingNotFound {
            session_id,
            key: "sound".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            format!("setting 'sound' not found for session {session_id}")
        );
    }

    #[test]
    fn test_invalid_state_message_names_operation_and_phase() {
        let err = DomainError::InvalidState {
            operation: "start",
            phase: "completed".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "invalid state: cannot start while session is completed"
        );
    }
}
