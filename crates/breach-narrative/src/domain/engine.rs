//! The progression engine: the aggregate root for one learner session.
//!
//! `NotStarted -> InProgress -> Completed`, with `reset` returning to
//! `NotStarted` from any phase. Every operation validates before it mutates,
//! so a rejected call leaves the session untouched.

use std::sync::Arc;

use breach_content::domain::catalog::ScenarioCatalog;
use breach_content::domain::scenario::Scenario;
use breach_core::aggregate::AggregateRoot;
use breach_core::clock::Clock;
use breach_core::error::DomainError;
use breach_core::event::EventMetadata;
use uuid::Uuid;

use super::compliance::{ComplianceMetrics, FeedbackRecord, LearnerFeedback};
use super::evaluator::evaluate;
use super::events::{
    ChoiceFeedback, ChoiceOption, ComplianceConcernFlagged, DisclaimerAccepted, DisplayEvent,
    FeedbackRecorded, NarrativeEvent, OversightRecorded, ScenarioPresented, SequenceCompleted,
    SessionReset,
};
use super::feedback::compose;
use super::metrics::MetricsSnapshot;
use super::state::{CompletedChoice, OversightAction, OversightRecord, SessionPhase, SessionState};

/// The aggregate root for a learner session.
#[derive(Debug)]
pub struct ProgressionEngine {
    /// Session identifier.
    pub id: Uuid,
    catalog: Arc<ScenarioCatalog>,
    /// Number of events committed so far. Survives resets.
    version: i64,
    state: SessionState,
    /// Disclaimer and content-concern record. Survives resets.
    compliance: ComplianceMetrics,
    /// Learner feedback on the simulation. Survives resets.
    feedback: Vec<FeedbackRecord>,
    uncommitted_events: Vec<NarrativeEvent>,
}

impl ProgressionEngine {
    /// Creates a session in the `NotStarted` phase.
    #[must_use]
    pub fn new(id: Uuid, catalog: Arc<ScenarioCatalog>) -> Self {
        Self {
            id,
            catalog,
            version: 0,
            state: SessionState::default(),
            compliance: ComplianceMetrics::default(),
            feedback: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Read-only view of the session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The catalog this session walks through.
    #[must_use]
    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// The scenario awaiting a choice, if the session is in progress.
    #[must_use]
    pub fn current_scenario(&self) -> Option<&Scenario> {
        match self.state.phase {
            SessionPhase::InProgress => self.catalog.get(self.state.current_index),
            SessionPhase::NotStarted | SessionPhase::Completed => None,
        }
    }

    /// Disclaimer and content-concern record.
    #[must_use]
    pub fn compliance(&self) -> &ComplianceMetrics {
        &self.compliance
    }

    /// Feedback submitted so far, oldest first.
    #[must_use]
    pub fn feedback(&self) -> &[FeedbackRecord] {
        &self.feedback
    }

    /// Owned copy of the session metrics.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.state.metrics.snapshot()
    }

    /// Share of the sequence reached: 0 before start, 100 once complete.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        match self.state.phase {
            SessionPhase::NotStarted => 0,
            SessionPhase::InProgress => {
                progress_percent(self.state.current_index, self.catalog.len())
            }
            SessionPhase::Completed => 100,
        }
    }

    /// Starts the session and presents the first scenario.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the session is `NotStarted`.
    pub fn start(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.state.phase != SessionPhase::NotStarted {
            return Err(self.invalid_state("start"));
        }

        let presented = self.present(0)?;
        self.state.phase = SessionPhase::InProgress;
        self.state.current_index = 0;
        self.state.started_at = Some(clock.now());
        self.emit(DisplayEvent::ScenarioPresented(presented), correlation_id, clock);
        Ok(())
    }

    /// Scores a choice for the current scenario, then advances to the next
    /// scenario or completes the sequence.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the session is `InProgress`,
    /// and `DomainError::UnknownChoice` if the current scenario has no such
    /// choice. Neither failure changes the session.
    pub fn submit_choice(
        &mut self,
        choice_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.state.phase != SessionPhase::InProgress {
            return Err(self.invalid_state("submit a choice"));
        }

        let catalog = Arc::clone(&self.catalog);
        let index = self.state.current_index;
        let scenario = catalog.get(index).ok_or_else(|| {
            DomainError::Infrastructure(format!("scenario index {index} out of range"))
        })?;
        let evaluation = evaluate(scenario, choice_id)?;
        let next_index = index + 1;
        let next_scenario = if next_index < catalog.len() {
            Some(self.present(next_index)?)
        } else {
            None
        };

        // Validation is complete; everything below mutates.
        let objectives_unlocked = evaluation
            .newly_unlocked_objective_ids
            .iter()
            .filter(|id| !self.state.metrics.has_achieved(id))
            .cloned()
            .collect();
        self.state.metrics.apply_choice(&evaluation);
        self.state.completed_choices.push(CompletedChoice {
            scenario_id: scenario.id.clone(),
            choice_id: evaluation.choice_id.clone(),
            recorded_at: clock.now(),
        });

        let feedback = compose(&evaluation);
        self.emit(
            DisplayEvent::ChoiceFeedback(ChoiceFeedback {
                evaluation,
                message: feedback.message,
                learning_points: feedback.learning_points,
                improvement_suggestions: feedback.improvement_suggestions,
                objectives_unlocked,
            }),
            correlation_id,
            clock,
        );

        if let Some(presented) = next_scenario {
            self.state.current_index = next_index;
            self.emit(DisplayEvent::ScenarioPresented(presented), correlation_id, clock);
        } else {
            self.state.current_index = catalog.len();
            self.state.phase = SessionPhase::Completed;
            let snapshot = self.state.metrics.snapshot();
            self.emit(
                DisplayEvent::SequenceCompleted(SequenceCompleted {
                    safety_score: snapshot.safety_score,
                    oversight_action_count: snapshot.oversight_action_count,
                    objectives_achieved: snapshot.objectives_achieved,
                    educational_progress: snapshot.educational_progress,
                    progress_percent: 100,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Records use of a human oversight control. Never moves the scenario
    /// pointer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the session has not started.
    pub fn record_oversight_action(
        &mut self,
        action: OversightAction,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.state.phase == SessionPhase::NotStarted {
            return Err(self.invalid_state("record an oversight action"));
        }

        self.state.metrics.apply_oversight_action();
        self.state.oversight_log.push(OversightRecord {
            action,
            recorded_at: clock.now(),
        });

        let (title, message) = action.acknowledgement();
        let snapshot = self.state.metrics.snapshot();
        self.emit(
            DisplayEvent::OversightRecorded(OversightRecorded {
                action,
                title: title.to_owned(),
                message: message.to_owned(),
                safety_score: snapshot.safety_score,
                oversight_action_count: snapshot.oversight_action_count,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Discards the session state and returns to `NotStarted`.
    pub fn reset(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        self.state = SessionState::default();
        self.emit(
            DisplayEvent::SessionReset(SessionReset {
                session_id: self.id,
            }),
            correlation_id,
            clock,
        );
    }

    /// Records acceptance of the educational disclaimer. Valid in every
    /// phase; accepting again refreshes the compliance check time.
    pub fn accept_disclaimer(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let accepted_at = clock.now();
        self.compliance.disclaimer_accepted = true;
        self.compliance.last_compliance_check = Some(accepted_at);
        self.emit(
            DisplayEvent::DisclaimerAccepted(DisclaimerAccepted { accepted_at }),
            correlation_id,
            clock,
        );
    }

    /// Stores learner feedback on the simulation. Valid in every phase.
    /// Detailed feedback that reports a content concern also flags the
    /// session for review.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a free-text answer is too long.
    pub fn submit_feedback(
        &mut self,
        feedback: LearnerFeedback,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        feedback.validate()?;

        let feedback_type = feedback.kind().to_owned();
        let concern = feedback.concern();
        self.feedback.push(FeedbackRecord {
            feedback,
            scenario_id: self.current_scenario().map(|s| s.id.clone()),
            recorded_at: clock.now(),
        });

        self.emit(
            DisplayEvent::FeedbackRecorded(FeedbackRecorded {
                feedback_type,
                title: "Thank You!".to_owned(),
                message: "Your feedback helps improve AI safety education for everyone."
                    .to_owned(),
                feedback_count: self.feedback.len(),
            }),
            correlation_id,
            clock,
        );

        if let Some(content_appropriateness) = concern {
            self.compliance.inappropriate_content_reported = true;
            self.emit(
                DisplayEvent::ComplianceConcernFlagged(ComplianceConcernFlagged {
                    session_id: self.id,
                    content_appropriateness,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> DomainError {
        DomainError::InvalidState {
            operation,
            phase: self.state.phase.to_string(),
        }
    }

    fn present(&self, index: usize) -> Result<ScenarioPresented, DomainError> {
        let scenario = self.catalog.get(index).ok_or_else(|| {
            DomainError::Infrastructure(format!("scenario index {index} out of range"))
        })?;

        Ok(ScenarioPresented {
            scenario_id: scenario.id.clone(),
            title: scenario.title.clone(),
            situation: scenario.situation.clone(),
            context: scenario.context.clone(),
            note: scenario.note.clone(),
            ai_recommendation: scenario.ai_recommendation.clone(),
            choices: scenario
                .choices
                .iter()
                .map(|c| ChoiceOption {
                    id: c.id.clone(),
                    text: c.text.clone(),
                    category: c.category.clone(),
                    educational_weight: c.educational_weight,
                })
                .collect(),
            scenario_number: index + 1,
            scenario_count: self.catalog.len(),
            progress_percent: progress_percent(index, self.catalog.len()),
        })
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn emit(&mut self, kind: DisplayEvent, correlation_id: Uuid, clock: &dyn Clock) {
        let event = NarrativeEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                session_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for ProgressionEngine {
    type Event = NarrativeEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    #[allow(clippy::cast_possible_wrap)]
    fn clear_uncommitted_events(&mut self) {
        self.version += self.uncommitted_events.len() as i64;
        self.uncommitted_events.clear();
    }
}

/// Rounded percentage of the sequence reached once scenario `index` is shown.
fn progress_percent(index: usize, len: usize) -> u8 {
    if len == 0 {
        return 100;
    }
    let percent = ((index + 1) * 100 + len / 2) / len;
    u8::try_from(percent.min(100)).unwrap_or(100)
}
