//! Authored scenario schema.
//!
//! Every type here is immutable once the catalog has been loaded. Identifiers
//! are plain strings because they are written by content authors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Authored tier indicating how strongly a choice exemplifies a desired
/// safety behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationalWeight {
    /// Strongly demonstrates safe behavior.
    High,
    /// Partially demonstrates safe behavior.
    Medium,
    /// Demonstrates a risky or dismissive behavior.
    Low,
}

impl EducationalWeight {
    /// Returns the lowercase label used in authored content.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One selectable option within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Identifier, unique within the owning scenario.
    pub id: String,
    /// Button text shown to the learner.
    pub text: String,
    /// Free-form tag such as `oversight`, `automation` or `escalation`.
    pub category: String,
    /// Authored educational tier.
    pub educational_weight: EducationalWeight,
    /// Short description of what picking this choice demonstrates.
    pub consequence: String,
}

/// A learning goal unlocked by submitting specific choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningObjective {
    /// Identifier, unique across the catalog.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Choices that satisfy this objective.
    pub trigger_choice_ids: BTreeSet<String>,
}

/// The simulated AI system's recommendation the learner is asked to review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRecommendation {
    /// The action the AI proposes.
    pub action: String,
    /// The AI's stated reasoning.
    pub reasoning: String,
    /// Self-reported confidence in `[0, 1]`.
    pub confidence: f64,
    /// Risks a careful reviewer should notice.
    #[serde(default)]
    pub potential_risks: Vec<String>,
    /// Ways the recommendation diverges from human values.
    #[serde(default)]
    pub alignment_issues: Vec<String>,
}

/// One authored unit of narrative plus its choice set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Identifier, unique across the catalog.
    pub id: String,
    /// Display title.
    pub title: String,
    /// One-line summary.
    pub description: String,
    /// Topic tag, e.g. `alignment`.
    #[serde(default)]
    pub category: String,
    /// Difficulty label, e.g. `beginner`.
    #[serde(default)]
    pub difficulty: String,
    /// What is happening.
    pub situation: String,
    /// Why it matters.
    pub context: String,
    /// Educational note shown alongside the situation.
    #[serde(default)]
    pub note: String,
    /// Recommendation produced by the simulated AI, if the scenario has one.
    #[serde(default)]
    pub ai_recommendation: Option<AiRecommendation>,
    /// Ordered choices offered to the learner.
    pub choices: Vec<Choice>,
    /// Choices that prioritize safety.
    #[serde(default)]
    pub safety_choice_ids: BTreeSet<String>,
    /// Choices that demonstrate human oversight.
    #[serde(default)]
    pub oversight_choice_ids: BTreeSet<String>,
    /// Choices that take on avoidable risk.
    #[serde(default)]
    pub risk_choice_ids: BTreeSet<String>,
    /// Objectives this scenario can unlock.
    #[serde(default)]
    pub objectives: Vec<LearningObjective>,
}

impl Scenario {
    /// Looks up a choice by id.
    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}
