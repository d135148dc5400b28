//! Query handlers for the Scenario Progression context.
//!
//! Views are read straight from the live engine in the registry; the event
//! log is only consulted for the audit listing.

use breach_core::aggregate::AggregateRoot;
use breach_core::clock::Clock;
use breach_core::error::DomainError;
use breach_core::repository::{EventRepository, StoredEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::registry::SessionRegistry;
use crate::domain::compliance::{ComplianceMetrics, FeedbackRecord};
use crate::domain::metrics::MetricsSnapshot;
use crate::domain::state::{CompletedChoice, OversightRecord, SessionPhase};

/// Read-only view of a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Index of the current scenario.
    pub current_index: usize,
    /// The scenario awaiting a choice, if any.
    pub current_scenario_id: Option<String>,
    /// Share of the sequence reached.
    pub progress_percent: u8,
    /// Session metrics.
    pub metrics: MetricsSnapshot,
    /// Scored submissions, oldest first.
    pub completed_choices: Vec<CompletedChoice>,
    /// Oversight control uses, oldest first.
    pub oversight_log: Vec<OversightRecord>,
    /// Number of events committed.
    pub version: i64,
}

/// Timing of the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// When the run was started, if it has been.
    pub started_at: Option<DateTime<Utc>>,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Milliseconds between start and generation.
    pub duration_ms: Option<i64>,
}

/// End-of-session report.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    /// The session identifier.
    pub session_id: Uuid,
    /// Timing of the current run.
    pub session_summary: SessionSummary,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Scenarios answered.
    pub scenarios_completed: usize,
    /// Scenarios in the catalog.
    pub scenario_count: usize,
    /// Session metrics.
    pub metrics: MetricsSnapshot,
    /// Study suggestions derived from the metrics.
    pub recommendations: Vec<String>,
    /// Disclaimer and content-concern record.
    pub compliance: ComplianceMetrics,
    /// Learner feedback on the simulation, oldest first.
    pub feedback: Vec<FeedbackRecord>,
    /// Hash of the catalog the session ran against.
    pub catalog_version_hash: String,
}

/// Report plus the retained event log, for download.
#[derive(Debug, Serialize)]
pub struct SessionExport {
    /// The report as of export time.
    pub report: SessionReport,
    /// Retained log entries, oldest first.
    pub events: Vec<StoredEvent>,
    /// When the export was produced.
    pub exported_at: DateTime<Utc>,
    /// Marks the bundle as coming from an educational simulation.
    pub educational_context: bool,
}

/// Retrieves a session view.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown id.
pub fn get_session_by_id(
    session_id: Uuid,
    registry: &SessionRegistry,
) -> Result<SessionView, DomainError> {
    registry.with_session(session_id, |engine| {
        let state = engine.state();
        Ok(SessionView {
            session_id,
            phase: engine.phase(),
            current_index: state.current_index(),
            current_scenario_id: engine.current_scenario().map(|s| s.id.clone()),
            progress_percent: engine.progress_percent(),
            metrics: engine.snapshot(),
            completed_choices: state.completed_choices().to_vec(),
            oversight_log: state.oversight_log().to_vec(),
            version: engine.version(),
        })
    })
}

/// Builds the end-of-session report. Available in every phase.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown id.
pub fn get_session_report(
    session_id: Uuid,
    registry: &SessionRegistry,
    clock: &dyn Clock,
) -> Result<SessionReport, DomainError> {
    let generated_at = clock.now();
    registry.with_session(session_id, |engine| {
        let metrics = engine.snapshot();
        let started_at = engine.state().started_at();
        Ok(SessionReport {
            session_id,
            session_summary: SessionSummary {
                started_at,
                generated_at,
                duration_ms: started_at.map(|t| (generated_at - t).num_milliseconds()),
            },
            phase: engine.phase(),
            scenarios_completed: engine.state().completed_choices().len(),
            scenario_count: engine.catalog().len(),
            recommendations: metrics.recommendations(),
            metrics,
            compliance: engine.compliance().clone(),
            feedback: engine.feedback().to_vec(),
            catalog_version_hash: engine.catalog().version_hash().to_owned(),
        })
    })
}

/// Lists the retained log entries for a session, oldest first.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown id, or the
/// repository's error if loading fails.
pub async fn get_session_events(
    session_id: Uuid,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    if !registry.contains(session_id)? {
        return Err(DomainError::SessionNotFound(session_id));
    }
    repo.load_events(session_id).await
}

/// Bundles the report with the retained event log.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown id, or the
/// repository's error if loading fails.
pub async fn get_session_export(
    session_id: Uuid,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
    clock: &dyn Clock,
) -> Result<SessionExport, DomainError> {
    let report = get_session_report(session_id, registry, clock)?;
    let events = repo.load_events(session_id).await?;
    Ok(SessionExport {
        report,
        events,
        exported_at: clock.now(),
        educational_context: true,
    })
}
