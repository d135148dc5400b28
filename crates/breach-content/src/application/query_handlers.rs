//! Query handlers for the Scenario Catalog context.
//!
//! Read-only views over the loaded catalog for listing endpoints.

use serde::Serialize;

use crate::domain::catalog::ScenarioCatalog;

/// Summary of one scenario, without its choice set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSummaryView {
    /// The scenario identifier.
    pub scenario_id: String,
    /// One-based position in the sequence.
    pub position: usize,
    /// Display title.
    pub title: String,
    /// One-line summary.
    pub description: String,
    /// Topic tag.
    pub category: String,
    /// Difficulty label.
    pub difficulty: String,
    /// Number of choices offered.
    pub choice_count: usize,
    /// Objectives the scenario can unlock.
    pub objective_ids: Vec<String>,
}

/// A learning objective and the scenario that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectiveView {
    /// The objective identifier.
    pub objective_id: String,
    /// The scenario that can unlock it.
    pub scenario_id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
}

/// Lists every scenario in sequence order.
#[must_use]
pub fn list_scenarios(catalog: &ScenarioCatalog) -> Vec<ScenarioSummaryView> {
    catalog
        .scenarios()
        .iter()
        .enumerate()
        .map(|(index, s)| ScenarioSummaryView {
            scenario_id: s.id.clone(),
            position: index + 1,
            title: s.title.clone(),
            description: s.description.clone(),
            category: s.category.clone(),
            difficulty: s.difficulty.clone(),
            choice_count: s.choices.len(),
            objective_ids: s.objectives.iter().map(|o| o.id.clone()).collect(),
        })
        .collect()
}

/// Lists every learning objective in catalog order.
#[must_use]
pub fn list_objectives(catalog: &ScenarioCatalog) -> Vec<ObjectiveView> {
    catalog
        .scenarios()
        .iter()
        .flat_map(|s| {
            s.objectives.iter().map(|o| ObjectiveView {
                objective_id: o.id.clone(),
                scenario_id: s.id.clone(),
                title: o.title.clone(),
                description: o.description.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_scenarios_numbers_positions_from_one() {
        // Arrange
        let catalog = ScenarioCatalog::builtin().unwrap();

        // Act
        let views = list_scenarios(&catalog);

        // Assert
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].position, 1);
        assert_eq!(views[0].scenario_id, "intro_oversight");
        assert_eq!(views[0].choice_count, 4);
        assert_eq!(views[2].position, 3);
        assert_eq!(views[2].difficulty, "advanced");
    }

    #[test]
    fn test_list_objectives_links_each_objective_to_its_scenario() {
        // Arrange
        let catalog = ScenarioCatalog::builtin().unwrap();

        // Act
        let views = list_objectives(&catalog);

        // Assert
        assert_eq!(views.len(), 3);
        assert_eq!(views[1].objective_id, "recognize_misalignment");
        assert_eq!(views[1].scenario_id, "alignment_challenge");
    }
}
