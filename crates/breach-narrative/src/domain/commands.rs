//! Commands for the Scenario Progression context.

use breach_core::command::Command;
use uuid::Uuid;

use super::compliance::LearnerFeedback;
use super::state::OversightAction;

/// Command to start a session and present the first scenario.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to start.
    pub session_id: Uuid,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "narrative.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to submit a choice for the current scenario.
#[derive(Debug, Clone)]
pub struct SubmitChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the choice belongs to.
    pub session_id: Uuid,
    /// The choice identifier within the current scenario.
    pub choice_id: String,
}

impl Command for SubmitChoice {
    fn command_type(&self) -> &'static str {
        "narrative.submit_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record use of a human oversight control.
#[derive(Debug, Clone)]
pub struct RecordOversightAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the action belongs to.
    pub session_id: Uuid,
    /// The control used.
    pub action: OversightAction,
}

impl Command for RecordOversightAction {
    fn command_type(&self) -> &'static str {
        "narrative.record_oversight_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to reset a session to its initial state.
#[derive(Debug, Clone)]
pub struct ResetSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to reset.
    pub session_id: Uuid,
}

impl Command for ResetSession {
    fn command_type(&self) -> &'static str {
        "narrative.reset_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record acceptance of the educational disclaimer.
#[derive(Debug, Clone)]
pub struct AcceptDisclaimer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session accepting the disclaimer.
    pub session_id: Uuid,
}

impl Command for AcceptDisclaimer {
    fn command_type(&self) -> &'static str {
        "narrative.accept_disclaimer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to store learner feedback on the simulation.
#[derive(Debug, Clone)]
pub struct SubmitFeedback {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session the feedback belongs to.
    pub session_id: Uuid,
    /// What the learner said.
    pub feedback: LearnerFeedback,
}

impl Command for SubmitFeedback {
    fn command_type(&self) -> &'static str {
        "narrative.submit_feedback"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to end a session and discard everything stored for it.
#[derive(Debug, Clone)]
pub struct EndSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to end.
    pub session_id: Uuid,
}

impl Command for EndSession {
    fn command_type(&self) -> &'static str {
        "narrative.end_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
