//! Choice evaluation: classifies a submitted choice against its scenario.

use breach_content::domain::scenario::{EducationalWeight, Scenario};
use breach_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Classification of one submitted choice. Derived, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The scenario the choice was made in.
    pub scenario_id: String,
    /// The submitted choice.
    pub choice_id: String,
    /// The choice is in the scenario's safety set.
    pub emphasizes_safety: bool,
    /// The choice is in the scenario's oversight set.
    pub shows_oversight: bool,
    /// The choice is NOT in the scenario's risk set. A choice absent from
    /// every classification set therefore still counts as identifying risk.
    pub identifies_risk: bool,
    /// The choice is tagged `alignment`.
    pub alignment_aware: bool,
    /// The choice is tagged `de_escalation` or `diplomacy`.
    pub de_escalates: bool,
    /// Authored educational tier.
    pub educational_weight: EducationalWeight,
    /// Authored consequence text.
    pub consequence: String,
    /// Objectives of this scenario triggered by the choice, in authored order.
    pub newly_unlocked_objective_ids: Vec<String>,
}

/// Evaluates `choice_id` against `scenario`. Pure and deterministic.
///
/// # Errors
///
/// Returns `DomainError::UnknownChoice` if the scenario has no such choice.
pub fn evaluate(scenario: &Scenario, choice_id: &str) -> Result<EvaluationResult, DomainError> {
    let choice = scenario
        .choice(choice_id)
        .ok_or_else(|| DomainError::UnknownChoice {
            scenario_id: scenario.id.clone(),
            choice_id: choice_id.to_owned(),
        })?;

    let newly_unlocked_objective_ids = scenario
        .objectives
        .iter()
        .filter(|o| o.trigger_choice_ids.contains(choice_id))
        .map(|o| o.id.clone())
        .collect();

    Ok(EvaluationResult {
        scenario_id: scenario.id.clone(),
        choice_id: choice.id.clone(),
        emphasizes_safety: scenario.safety_choice_ids.contains(choice_id),
        shows_oversight: scenario.oversight_choice_ids.contains(choice_id),
        identifies_risk: !scenario.risk_choice_ids.contains(choice_id),
        alignment_aware: choice.category == "alignment",
        de_escalates: matches!(choice.category.as_str(), "de_escalation" | "diplomacy"),
        educational_weight: choice.educational_weight,
        consequence: choice.consequence.clone(),
        newly_unlocked_objective_ids,
    })
}
