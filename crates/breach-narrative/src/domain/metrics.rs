//! Session metrics: safety score, oversight count, objectives, and progress.

use std::collections::BTreeSet;

use breach_content::domain::scenario::EducationalWeight;
use serde::{Deserialize, Serialize};

use super::evaluator::EvaluationResult;

/// Score every session starts with.
pub const INITIAL_SAFETY_SCORE: u8 = 100;

/// Upper bound of the safety score.
pub const MAX_SAFETY_SCORE: u8 = 100;

/// Flat bonus awarded for each oversight action.
const OVERSIGHT_BONUS: i32 = 2;

/// Scenario-progress credit for each scored choice that shows oversight.
const OVERSIGHT_CHOICE_PROGRESS: u32 = 2;

/// Score delta applied for a choice of the given tier.
#[must_use]
pub fn safety_delta(weight: EducationalWeight) -> i32 {
    match weight {
        EducationalWeight::High => 5,
        EducationalWeight::Medium => 2,
        EducationalWeight::Low => -1,
    }
}

/// Accumulates session metrics. Owns nothing but its own counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsAggregator {
    safety_score: u8,
    oversight_action_count: u32,
    objectives_achieved: BTreeSet<String>,
    scenario_progress: u32,
    applied: BTreeSet<(String, String)>,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self {
            safety_score: INITIAL_SAFETY_SCORE,
            oversight_action_count: 0,
            objectives_achieved: BTreeSet::new(),
            scenario_progress: 0,
            applied: BTreeSet::new(),
        }
    }
}

impl MetricsAggregator {
    /// Creates a fresh aggregator with a full safety score.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a scored choice.
    ///
    /// Each `(scenario_id, choice_id)` pair is counted at most once, so a
    /// replayed submission changes nothing. Returns whether the result was
    /// applied.
    pub fn apply_choice(&mut self, result: &EvaluationResult) -> bool {
        let key = (result.scenario_id.clone(), result.choice_id.clone());
        if !self.applied.insert(key) {
            return false;
        }

        self.adjust_score(safety_delta(result.educational_weight));
        self.objectives_achieved
            .extend(result.newly_unlocked_objective_ids.iter().cloned());
        if result.shows_oversight {
            self.scenario_progress += OVERSIGHT_CHOICE_PROGRESS;
        }
        true
    }

    /// Records one human oversight action.
    pub fn apply_oversight_action(&mut self) {
        self.oversight_action_count = self.oversight_action_count.saturating_add(1);
        self.adjust_score(OVERSIGHT_BONUS);
    }

    /// Whether the objective has been achieved.
    #[must_use]
    pub fn has_achieved(&self, objective_id: &str) -> bool {
        self.objectives_achieved.contains(objective_id)
    }

    /// Returns an owned copy of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            safety_score: self.safety_score,
            oversight_action_count: self.oversight_action_count,
            objectives_achieved: self.objectives_achieved.iter().cloned().collect(),
            scenario_progress: self.scenario_progress,
            educational_progress: self.educational_progress(),
        }
    }

    fn adjust_score(&mut self, delta: i32) {
        let next = (i32::from(self.safety_score) + delta).clamp(0, i32::from(MAX_SAFETY_SCORE));
        // Clamped into 0..=100 above.
        self.safety_score = u8::try_from(next).unwrap_or(MAX_SAFETY_SCORE);
    }

    /// Weighted blend: safety score up to 40, oversight actions up to 30,
    /// scenario progress up to 30.
    fn educational_progress(&self) -> u8 {
        let safety = u32::from(self.safety_score) * 40 / u32::from(MAX_SAFETY_SCORE);
        let oversight = self.oversight_action_count.saturating_mul(10).min(30);
        let scenarios = self.scenario_progress.min(30);
        u8::try_from((safety.min(40) + oversight + scenarios).min(100)).unwrap_or(100)
    }
}

/// Immutable copy of the session counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Safety score in `[0, 100]`.
    pub safety_score: u8,
    /// Number of oversight actions taken.
    pub oversight_action_count: u32,
    /// Achieved objective ids, sorted.
    pub objectives_achieved: Vec<String>,
    /// Credit earned from oversight-demonstrating choices.
    pub scenario_progress: u32,
    /// Overall educational progress in `[0, 100]`.
    pub educational_progress: u8,
}

impl MetricsSnapshot {
    /// Study suggestions for the end-of-session report.
    #[must_use]
    pub fn recommendations(&self) -> Vec<String> {
        let mut recommendations = Vec::new();
        if self.oversight_action_count < 3 {
            recommendations.push(
                "Try using more human oversight controls to demonstrate safety principles"
                    .to_owned(),
            );
        }
        if self.objectives_achieved.len() < 2 {
            recommendations.push(
                "Focus on achieving learning objectives for maximum educational benefit".to_owned(),
            );
        }
        if self.safety_score < 70 {
            recommendations
                .push("Consider more safety-focused decisions to improve understanding".to_owned());
        }
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(
        scenario_id: &str,
        choice_id: &str,
        weight: EducationalWeight,
        objectives: &[&str],
    ) -> EvaluationResult {
        EvaluationResult {
            scenario_id: scenario_id.to_owned(),
            choice_id: choice_id.to_owned(),
            emphasizes_safety: false,
            shows_oversight: false,
            identifies_risk: true,
            alignment_aware: false,
            de_escalates: false,
            educational_weight: weight,
            consequence: String::new(),
            newly_unlocked_objective_ids: objectives.iter().map(|o| (*o).to_owned()).collect(),
        }
    }

    #[test]
    fn test_new_aggregator_starts_at_full_score() {
        let snapshot = MetricsAggregator::new().snapshot();

        assert_eq!(snapshot.safety_score, 100);
        assert_eq!(snapshot.oversight_action_count, 0);
        assert!(snapshot.objectives_achieved.is_empty());
    }

    #[test]
    fn test_high_weight_choice_clamps_at_maximum() {
        let mut metrics = MetricsAggregator::new();

        metrics.apply_choice(&result("s1", "c1", EducationalWeight::High, &[]));

        assert_eq!(metrics.snapshot().safety_score, 100);
    }

    #[test]
    fn test_weight_deltas_accumulate() {
        let mut metrics = MetricsAggregator::new();

        metrics.apply_choice(&result("s1", "c1", EducationalWeight::Low, &[]));
        metrics.apply_choice(&result("s2", "c2", EducationalWeight::Low, &[]));
        metrics.apply_choice(&result("s3", "c3", EducationalWeight::Medium, &[]));

        assert_eq!(metrics.snapshot().safety_score, 100);

        metrics.apply_choice(&result("s4", "c4", EducationalWeight::Low, &[]));
        metrics.apply_choice(&result("s5", "c5", EducationalWeight::Low, &[]));

        assert_eq!(metrics.snapshot().safety_score, 98);
    }

    #[test]
    fn test_score_never_drops_below_zero() {
        let mut metrics = MetricsAggregator::new();

        for i in 0..250 {
            metrics.apply_choice(&result(&format!("s{i}"), "c", EducationalWeight::Low, &[]));
            let score = metrics.snapshot().safety_score;
            assert!(score <= MAX_SAFETY_SCORE);
        }

        assert_eq!(metrics.snapshot().safety_score, 0);
    }

    #[test]
    fn test_score_stays_in_bounds_for_mixed_sequences() {
        let weights = [
            EducationalWeight::Low,
            EducationalWeight::High,
            EducationalWeight::Low,
            EducationalWeight::Low,
            EducationalWeight::Medium,
        ];
        let mut metrics = MetricsAggregator::new();

        for i in 0..500 {
            if i % 7 == 0 {
                metrics.apply_oversight_action();
            } else {
                let weight = weights[i % weights.len()];
                metrics.apply_choice(&result(&format!("s{i}"), "c", weight, &[]));
            }
            assert!(metrics.snapshot().safety_score <= MAX_SAFETY_SCORE);
        }
    }

    #[test]
    fn test_replayed_result_is_applied_once() {
        let mut metrics = MetricsAggregator::new();
        metrics.apply_choice(&result("s0", "c0", EducationalWeight::Low, &[]));
        let submission = result("s1", "c1", EducationalWeight::Low, &["objective"]);

        let first = metrics.apply_choice(&submission);
        let second = metrics.apply_choice(&submission);

        assert!(first);
        assert!(!second);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.safety_score, 98);
        assert_eq!(snapshot.objectives_achieved, ["objective"]);
    }

    #[test]
    fn test_objectives_never_shrink() {
        let mut metrics = MetricsAggregator::new();
        let mut previous = 0;
        let cases: [&[&str]; 5] = [&["a"], &[], &["a", "b"], &["c"], &[]];

        for (i, objectives) in cases.into_iter().enumerate() {
            metrics.apply_choice(&result(&format!("s{i}"), "c", EducationalWeight::Medium, objectives));
            let count = metrics.snapshot().objectives_achieved.len();
            assert!(count >= previous);
            previous = count;
        }

        assert_eq!(metrics.snapshot().objectives_achieved, ["a", "b", "c"]);
        assert!(metrics.has_achieved("b"));
    }

    #[test]
    fn test_oversight_action_counts_and_rewards() {
        let mut metrics = MetricsAggregator::new();
        for i in 0..4 {
            metrics.apply_choice(&result(&format!("s{i}"), "c", EducationalWeight::Low, &[]));
        }

        metrics.apply_oversight_action();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.oversight_action_count, 1);
        assert_eq!(snapshot.safety_score, 98);
    }

    #[test]
    fn test_oversight_bonus_clamps_at_maximum() {
        let mut metrics = MetricsAggregator::new();

        metrics.apply_oversight_action();

        assert_eq!(metrics.snapshot().safety_score, 100);
    }

    #[test]
    fn test_educational_progress_blends_components() {
        let mut metrics = MetricsAggregator::new();
        let mut oversight_choice = result("s1", "c1", EducationalWeight::High, &[]);
        oversight_choice.shows_oversight = true;

        metrics.apply_choice(&oversight_choice);
        metrics.apply_oversight_action();

        // 40 (full score) + 10 (one action) + 2 (one oversight choice)
        assert_eq!(metrics.snapshot().educational_progress, 52);
    }

    #[test]
    fn test_educational_progress_caps_at_one_hundred() {
        let mut metrics = MetricsAggregator::new();
        for i in 0..20 {
            let mut r = result(&format!("s{i}"), "c", EducationalWeight::High, &[]);
            r.shows_oversight = true;
            metrics.apply_choice(&r);
            metrics.apply_oversight_action();
        }

        assert_eq!(metrics.snapshot().educational_progress, 100);
    }

    #[test]
    fn test_recommendations_for_fresh_session() {
        let snapshot = MetricsAggregator::new().snapshot();

        let recommendations = snapshot.recommendations();

        assert_eq!(recommendations.len(), 2);
        assert!(recommendations[0].contains("oversight controls"));
        assert!(recommendations[1].contains("learning objectives"));
    }

    #[test]
    fn test_recommendations_flag_low_safety_score() {
        let snapshot = MetricsSnapshot {
            safety_score: 40,
            oversight_action_count: 5,
            objectives_achieved: vec!["a".to_owned(), "b".to_owned()],
            scenario_progress: 0,
            educational_progress: 0,
        };

        assert_eq!(
            snapshot.recommendations(),
            ["Consider more safety-focused decisions to improve understanding"]
        );
    }
}
