//! Load-time validation of authored scenarios.

use std::collections::HashSet;

use breach_core::error::DomainError;

use super::scenario::Scenario;

/// Checks every cross-reference in the authored content.
///
/// All problems are collected so an author sees the full list in one pass.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every problem found.
pub(crate) fn validate(scenarios: &[Scenario]) -> Result<(), DomainError> {
    let mut problems = Vec::new();

    if scenarios.is_empty() {
        problems.push("catalog contains no scenarios".to_owned());
    }

    let mut scenario_ids = HashSet::new();
    let mut objective_ids = HashSet::new();

    for scenario in scenarios {
        if scenario.id.trim().is_empty() {
            problems.push(format!("scenario '{}' has a blank id", scenario.title));
        }
        if !scenario_ids.insert(scenario.id.as_str()) {
            problems.push(format!("duplicate scenario id '{}'", scenario.id));
        }
        if scenario.choices.is_empty() {
            problems.push(format!("scenario '{}' has no choices", scenario.id));
        }

        let mut choice_ids = HashSet::new();
        for choice in &scenario.choices {
            if !choice_ids.insert(choice.id.as_str()) {
                problems.push(format!(
                    "scenario '{}' has duplicate choice id '{}'",
                    scenario.id, choice.id
                ));
            }
        }

        let classification_sets = [
            ("safety", &scenario.safety_choice_ids),
            ("oversight", &scenario.oversight_choice_ids),
            ("risk", &scenario.risk_choice_ids),
        ];
        for (set_name, ids) in classification_sets {
            for id in ids {
                if !choice_ids.contains(id.as_str()) {
                    problems.push(format!(
                        "scenario '{}' {set_name} set references unknown choice '{id}'",
                        scenario.id
                    ));
                }
            }
        }

        for objective in &scenario.objectives {
            if !objective_ids.insert(objective.id.as_str()) {
                problems.push(format!("duplicate objective id '{}'", objective.id));
            }
            for trigger in &objective.trigger_choice_ids {
                if !choice_ids.contains(trigger.as_str()) {
                    problems.push(format!(
                        "objective '{}' in scenario '{}' is triggered by unknown choice '{trigger}'",
                        objective.id, scenario.id
                    ));
                }
            }
        }

        if let Some(recommendation) = &scenario.ai_recommendation {
            if !(0.0..=1.0).contains(&recommendation.confidence) {
                problems.push(format!(
                    "scenario '{}' has AI confidence {} outside [0, 1]",
                    scenario.id, recommendation.confidence
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::scenario::{AiRecommendation, Choice, EducationalWeight, LearningObjective};

    fn choice(id: &str) -> Choice {
        Choice {
            id: id.to_owned(),
            text: format!("Choose {id}"),
            category: "oversight".to_owned(),
            educational_weight: EducationalWeight::High,
            consequence: "Something happens".to_owned(),
        }
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn scenario(id: &str) -> Scenario {
        Scenario {
            id: id.to_owned(),
            title: format!("Scenario {id}"),
            description: String::new(),
            category: String::new(),
            difficulty: String::new(),
            situation: "situation".to_owned(),
            context: "context".to_owned(),
            note: String::new(),
            ai_recommendation: None,
            choices: vec![choice("a"), choice("b")],
            safety_choice_ids: ids(&["a"]),
            oversight_choice_ids: ids(&["a"]),
            risk_choice_ids: ids(&["b"]),
            objectives: vec![LearningObjective {
                id: format!("{id}_objective"),
                title: "Objective".to_owned(),
                description: String::new(),
                trigger_choice_ids: ids(&["a"]),
            }],
        }
    }

    fn validation_message(scenarios: &[Scenario]) -> String {
        match validate(scenarios) {
            Err(DomainError::Validation(msg)) => msg,
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_well_formed_scenarios_pass() {
        assert!(validate(&[scenario("one"), scenario("two")]).is_ok());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert!(validation_message(&[]).contains("no scenarios"));
    }

    #[test]
    fn test_duplicate_scenario_ids_are_rejected() {
        let mut second = scenario("one");
        second.objectives[0].id = "other_objective".to_owned();

        let msg = validation_message(&[scenario("one"), second]);

        assert!(msg.contains("duplicate scenario id 'one'"));
    }

    #[test]
    fn test_scenario_without_choices_is_rejected() {
        let mut s = scenario("one");
        s.choices.clear();
        s.safety_choice_ids.clear();
        s.oversight_choice_ids.clear();
        s.risk_choice_ids.clear();
        s.objectives.clear();

        assert!(validation_message(&[s]).contains("has no choices"));
    }

    #[test]
    fn test_dangling_classification_reference_is_rejected() {
        let mut s = scenario("one");
        s.risk_choice_ids.insert("ghost".to_owned());

        let msg = validation_message(&[s]);

        assert!(msg.contains("risk set references unknown choice 'ghost'"));
    }

    #[test]
    fn test_dangling_objective_trigger_is_rejected() {
        let mut s = scenario("one");
        s.objectives[0].trigger_choice_ids.insert("ghost".to_owned());

        let msg = validation_message(&[s]);

        assert!(msg.contains("triggered by unknown choice 'ghost'"));
    }

    #[test]
    fn test_duplicate_choice_ids_are_rejected() {
        let mut s = scenario("one");
        s.choices.push(choice("a"));

        assert!(validation_message(&[s]).contains("duplicate choice id 'a'"));
    }

    #[test]
    fn test_out_of_range_confidence_is_rejected() {
        let mut s = scenario("one");
        s.ai_recommendation = Some(AiRecommendation {
            action: "block".to_owned(),
            reasoning: "pattern match".to_owned(),
            confidence: 1.5,
            potential_risks: Vec::new(),
            alignment_issues: Vec::new(),
        });

        assert!(validation_message(&[s]).contains("outside [0, 1]"));
    }

    #[test]
    fn test_every_problem_is_reported() {
        let mut s = scenario("one");
        s.safety_choice_ids.insert("x".to_owned());
        s.oversight_choice_ids.insert("y".to_owned());

        let msg = validation_message(&[s]);

        assert!(msg.contains("'x'"));
        assert!(msg.contains("'y'"));
    }
}
