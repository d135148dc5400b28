//! Display events emitted by the progression engine.
//!
//! These are structured data for the presentation layer; nothing here
//! contains markup.

use breach_content::domain::scenario::{AiRecommendation, EducationalWeight};
use breach_core::event::{DomainEvent, EventMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::compliance::ContentAppropriateness;
use super::evaluator::EvaluationResult;
use super::state::OversightAction;

/// Event type identifier for [`ScenarioPresented`].
pub const SCENARIO_PRESENTED_EVENT_TYPE: &str = "narrative.scenario_presented";

/// Event type identifier for [`ChoiceFeedback`].
pub const CHOICE_FEEDBACK_EVENT_TYPE: &str = "narrative.choice_feedback";

/// Event type identifier for [`SequenceCompleted`].
pub const SEQUENCE_COMPLETED_EVENT_TYPE: &str = "narrative.sequence_completed";

/// Event type identifier for [`OversightRecorded`].
pub const OVERSIGHT_RECORDED_EVENT_TYPE: &str = "narrative.oversight_recorded";

/// Event type identifier for [`SessionReset`].
pub const SESSION_RESET_EVENT_TYPE: &str = "narrative.session_reset";

/// Event type identifier for [`DisclaimerAccepted`].
pub const DISCLAIMER_ACCEPTED_EVENT_TYPE: &str = "narrative.disclaimer_accepted";

/// Event type identifier for [`FeedbackRecorded`].
pub const FEEDBACK_RECORDED_EVENT_TYPE: &str = "narrative.feedback_recorded";

/// Event type identifier for [`ComplianceConcernFlagged`].
pub const COMPLIANCE_CONCERN_FLAGGED_EVENT_TYPE: &str = "narrative.compliance_concern_flagged";

/// A choice as shown on a decision button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// The choice identifier to submit.
    pub id: String,
    /// Button text.
    pub text: String,
    /// Category hint.
    pub category: String,
    /// Educational tier hint.
    pub educational_weight: EducationalWeight,
}

/// Emitted when a scenario becomes current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPresented {
    /// The scenario identifier.
    pub scenario_id: String,
    /// Display title.
    pub title: String,
    /// What is happening.
    pub situation: String,
    /// Why it matters.
    pub context: String,
    /// Educational note.
    pub note: String,
    /// The simulated AI's recommendation, if any.
    pub ai_recommendation: Option<AiRecommendation>,
    /// Choices offered, in authored order.
    pub choices: Vec<ChoiceOption>,
    /// One-based position of this scenario.
    pub scenario_number: usize,
    /// Total number of scenarios.
    pub scenario_count: usize,
    /// Share of the sequence reached, including this scenario.
    pub progress_percent: u8,
}

/// Emitted after a choice has been scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceFeedback {
    /// The evaluation the feedback is based on.
    pub evaluation: EvaluationResult,
    /// Headline message.
    pub message: String,
    /// What the learner demonstrated.
    pub learning_points: Vec<String>,
    /// What the learner could do better.
    pub improvement_suggestions: Vec<String>,
    /// Objectives achieved for the first time by this choice.
    pub objectives_unlocked: Vec<String>,
}

/// Emitted when the last scenario has been answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCompleted {
    /// Final safety score.
    pub safety_score: u8,
    /// Oversight actions taken during the session.
    pub oversight_action_count: u32,
    /// Objectives achieved during the session.
    pub objectives_achieved: Vec<String>,
    /// Overall educational progress.
    pub educational_progress: u8,
    /// Always 100.
    pub progress_percent: u8,
}

/// Emitted when the learner uses a human oversight control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OversightRecorded {
    /// The control used.
    pub action: OversightAction,
    /// Headline.
    pub title: String,
    /// Explanation of what the control demonstrates.
    pub message: String,
    /// Safety score after the bonus.
    pub safety_score: u8,
    /// Oversight actions taken so far.
    pub oversight_action_count: u32,
}

/// Emitted when a session is reset to its initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReset {
    /// The session that was reset.
    pub session_id: Uuid,
}

/// Emitted when the learner accepts the educational disclaimer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclaimerAccepted {
    /// When the disclaimer was accepted.
    pub accepted_at: DateTime<Utc>,
}

/// Emitted when learner feedback has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecorded {
    /// `quick_rating` or `detailed_feedback`.
    pub feedback_type: String,
    /// Headline.
    pub title: String,
    /// Thank-you text.
    pub message: String,
    /// Feedback submissions stored so far.
    pub feedback_count: usize,
}

/// Emitted when detailed feedback reports a content concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceConcernFlagged {
    /// The session the concern was raised in.
    pub session_id: Uuid,
    /// The answer that raised it.
    pub content_appropriateness: ContentAppropriateness,
}

/// Event payload variants consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayEvent {
    /// A scenario has been presented.
    ScenarioPresented(ScenarioPresented),
    /// A choice has been scored.
    ChoiceFeedback(ChoiceFeedback),
    /// The sequence has been completed.
    SequenceCompleted(SequenceCompleted),
    /// An oversight control has been used.
    OversightRecorded(OversightRecorded),
    /// The session has been reset.
    SessionReset(SessionReset),
    /// The educational disclaimer has been accepted.
    DisclaimerAccepted(DisclaimerAccepted),
    /// Learner feedback has been stored.
    FeedbackRecorded(FeedbackRecorded),
    /// Learner feedback flagged the content for review.
    ComplianceConcernFlagged(ComplianceConcernFlagged),
}

impl DisplayEvent {
    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ScenarioPresented(_) => SCENARIO_PRESENTED_EVENT_TYPE,
            Self::ChoiceFeedback(_) => CHOICE_FEEDBACK_EVENT_TYPE,
            Self::SequenceCompleted(_) => SEQUENCE_COMPLETED_EVENT_TYPE,
            Self::OversightRecorded(_) => OVERSIGHT_RECORDED_EVENT_TYPE,
            Self::SessionReset(_) => SESSION_RESET_EVENT_TYPE,
            Self::DisclaimerAccepted(_) => DISCLAIMER_ACCEPTED_EVENT_TYPE,
            Self::FeedbackRecorded(_) => FEEDBACK_RECORDED_EVENT_TYPE,
            Self::ComplianceConcernFlagged(_) => COMPLIANCE_CONCERN_FLAGGED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Scenario Progression context.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: DisplayEvent,
}

impl DomainEvent for NarrativeEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("DisplayEvent serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
