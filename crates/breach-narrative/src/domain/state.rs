//! Per-session mutable state owned by the progression engine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::MetricsAggregator;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Created but not started.
    NotStarted,
    /// Walking through the scenarios.
    InProgress,
    /// Every scenario has been answered.
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Human oversight controls available to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversightAction {
    /// Pause the simulated AI.
    PauseAi,
    /// Review the simulated AI's current recommendation.
    ReviewDecision,
    /// Override the simulated AI.
    OverrideAi,
}

impl OversightAction {
    /// Headline and explanation shown when the control is used.
    #[must_use]
    pub fn acknowledgement(self) -> (&'static str, &'static str) {
        match self {
            Self::PauseAi => (
                "Human Oversight Demonstrated",
                "You have successfully paused the AI system. This demonstrates the importance of maintaining human control over AI decisions.",
            ),
            Self::ReviewDecision => (
                "AI Decision Reviewed",
                "You examined the AI's reasoning before acting on it. Reviewing risks and alignment issues is how humans catch flawed recommendations.",
            ),
            Self::OverrideAi => (
                "Human Override Activated",
                "You have overridden the AI system. This is a critical safety mechanism that ensures human judgment remains supreme in important decisions.",
            ),
        }
    }
}

/// One scored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedChoice {
    /// The scenario answered.
    pub scenario_id: String,
    /// The choice submitted.
    pub choice_id: String,
    /// When the choice was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// One oversight control use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OversightRecord {
    /// The control used.
    pub action: OversightAction,
    /// When it was used.
    pub recorded_at: DateTime<Utc>,
}

/// Mutable session state. Replaced wholesale on reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) current_index: usize,
    pub(crate) completed_choices: Vec<CompletedChoice>,
    pub(crate) oversight_log: Vec<OversightRecord>,
    pub(crate) metrics: MetricsAggregator,
    pub(crate) started_at: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            current_index: 0,
            completed_choices: Vec::new(),
            oversight_log: Vec::new(),
            metrics: MetricsAggregator::new(),
            started_at: None,
        }
    }
}

impl SessionState {
    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Index of the current scenario; equals the catalog length once the
    /// sequence is complete.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Append-only log of scored submissions.
    #[must_use]
    pub fn completed_choices(&self) -> &[CompletedChoice] {
        &self.completed_choices
    }

    /// Append-only log of oversight control uses.
    #[must_use]
    pub fn oversight_log(&self) -> &[OversightRecord] {
        &self.oversight_log
    }

    /// Session metrics.
    #[must_use]
    pub fn metrics(&self) -> &MetricsAggregator {
        &self.metrics
    }

    /// When the current run was started.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}
