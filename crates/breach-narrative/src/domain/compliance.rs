//! Learner feedback on the simulation and the compliance record kept
//! alongside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use breach_core::error::DomainError;

/// Longest accepted free-text answer, in characters.
pub const MAX_FEEDBACK_TEXT_CHARS: usize = 2000;

/// Answer to "how well did this scenario help you understand AI safety?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// How effective the simulation was at teaching AI safety concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effectiveness {
    VeryEffective,
    Effective,
    SomewhatEffective,
    NotEffective,
}

/// Whether any content seemed inappropriate or non-educational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentAppropriateness {
    AllAppropriate,
    MostlyAppropriate,
    SomeConcerns,
    InappropriateContent,
}

impl ContentAppropriateness {
    /// Whether this answer must be flagged for review.
    #[must_use]
    pub fn is_concern(self) -> bool {
        matches!(self, Self::SomeConcerns | Self::InappropriateContent)
    }
}

/// Feedback submitted by the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LearnerFeedback {
    /// One-click rating of the current scenario.
    QuickRating {
        /// The rating chosen.
        rating: QuickRating,
    },
    /// The full feedback form.
    DetailedFeedback {
        /// Overall effectiveness.
        effectiveness: Effectiveness,
        /// Aspects the learner found most valuable.
        #[serde(default)]
        valuable_aspects: Vec<String>,
        /// Suggested improvements.
        #[serde(default)]
        improvements: String,
        /// Content appropriateness answer.
        content_appropriateness: ContentAppropriateness,
        /// Anything else.
        #[serde(default)]
        additional_comments: String,
    },
}

impl LearnerFeedback {
    /// Wire name of the feedback kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::QuickRating { .. } => "quick_rating",
            Self::DetailedFeedback { .. } => "detailed_feedback",
        }
    }

    /// The appropriateness answer, when it raises a concern.
    #[must_use]
    pub fn concern(&self) -> Option<ContentAppropriateness> {
        match self {
            Self::DetailedFeedback {
                content_appropriateness,
                ..
            } if content_appropriateness.is_concern() => Some(*content_appropriateness),
            _ => None,
        }
    }

    /// Checks the free-text answers.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a text answer is too long.
    pub fn validate(&self) -> Result<(), DomainError> {
        let Self::DetailedFeedback {
            valuable_aspects,
            improvements,
            additional_comments,
            ..
        } = self
        else {
            return Ok(());
        };

        let too_long: Vec<&str> = [
            ("improvements", improvements.as_str()),
            ("additional_comments", additional_comments.as_str()),
        ]
        .into_iter()
        .chain(valuable_aspects.iter().map(|a| ("valuable_aspects", a.as_str())))
        .filter(|(_, text)| text.chars().count() > MAX_FEEDBACK_TEXT_CHARS)
        .map(|(field, _)| field)
        .collect();

        if too_long.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "feedback exceeds {MAX_FEEDBACK_TEXT_CHARS} characters in: {}",
                too_long.join(", ")
            )))
        }
    }
}

/// One stored feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// What the learner said.
    pub feedback: LearnerFeedback,
    /// The scenario on screen when it was submitted.
    pub scenario_id: Option<String>,
    /// When it was submitted.
    pub recorded_at: DateTime<Utc>,
}

/// Compliance state of a session. Survives resets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceMetrics {
    /// Whether the educational disclaimer has been accepted.
    pub disclaimer_accepted: bool,
    /// Latest acceptance.
    pub last_compliance_check: Option<DateTime<Utc>>,
    /// Whether any detailed feedback flagged the content.
    pub inappropriate_content_reported: bool,
}
