//! Feedback text for a scored choice.

use breach_content::domain::scenario::EducationalWeight;

use super::evaluator::EvaluationResult;

/// Learning point attached when the choice is in the scenario's safety set.
pub const SAFETY_LEARNING_POINT: &str =
    "You prioritized safety over efficiency - this is a key AI safety principle";

/// Learning point attached when the choice is in the scenario's oversight set.
pub const OVERSIGHT_LEARNING_POINT: &str =
    "You demonstrated the importance of human oversight in AI systems";

/// Message, learning points, and suggestions shown after a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Headline message.
    pub message: String,
    /// What the learner demonstrated.
    pub learning_points: Vec<String>,
    /// What the learner could do better.
    pub improvement_suggestions: Vec<String>,
}

/// Builds feedback for an evaluated choice.
///
/// The tier decides the tone: affirming for `high`, neutral with an
/// improvement suggestion for `medium`, cautionary with a risk-awareness
/// suggestion for `low`. The safety and oversight learning points follow the
/// classification flags on every tier.
#[must_use]
pub fn compose(result: &EvaluationResult) -> Feedback {
    let consequence = &result.consequence;
    let (message, learning_point, suggestion) = match result.educational_weight {
        EducationalWeight::High => (
            format!("Excellent choice! {consequence}"),
            "This decision demonstrates good understanding of AI safety principles",
            None,
        ),
        EducationalWeight::Medium => (
            format!("Good thinking. {consequence}"),
            "This choice shows awareness of the issues involved",
            Some("Consider how this decision might affect long-term safety"),
        ),
        EducationalWeight::Low => (
            format!("This choice provides a learning opportunity. {consequence}"),
            "Consider the potential risks and unintended consequences",
            Some("Think about how human oversight could improve this decision"),
        ),
    };

    let mut learning_points = vec![learning_point.to_owned()];
    if result.emphasizes_safety {
        learning_points.push(SAFETY_LEARNING_POINT.to_owned());
    }
    if result.shows_oversight {
        learning_points.push(OVERSIGHT_LEARNING_POINT.to_owned());
    }

    Feedback {
        message,
        learning_points,
        improvement_suggestions: suggestion.into_iter().map(str::to_owned).collect(),
    }
}
