//! Command handlers for the Scenario Progression context.
//!
//! Each handler takes the session's command lock, runs one engine operation
//! under the registry lock, drains the resulting events, then appends them to
//! the session log before releasing the command lock. Commands on one session
//! therefore reach the log in sequence order.

use std::sync::Arc;

use breach_content::domain::catalog::ScenarioCatalog;
use breach_core::aggregate::AggregateRoot;
use breach_core::clock::Clock;
use breach_core::command::Command;
use breach_core::error::DomainError;
use breach_core::event::DomainEvent;
use breach_core::repository::{EventRepository, SettingsStore, StoredEvent};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::query_handlers::{SessionReport, get_session_report};
use super::registry::SessionRegistry;
use crate::domain::commands::{
    AcceptDisclaimer, EndSession, RecordOversightAction, ResetSession, StartSession, SubmitChoice,
    SubmitFeedback,
};
use crate::domain::engine::ProgressionEngine;
use crate::domain::events::{DisplayEvent, NarrativeEvent};

/// Outcome of a session command.
#[derive(Debug, Clone)]
pub struct SessionCommandResult {
    /// The session the command ran against.
    pub session_id: Uuid,
    /// Display events produced, in emission order.
    pub events: Vec<DisplayEvent>,
    /// The same events as appended to the session log.
    pub stored_events: Vec<StoredEvent>,
}

fn to_stored_event(event: &NarrativeEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        session_id: meta.session_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        occurred_at: meta.occurred_at,
    }
}

async fn execute(
    command: &dyn Command,
    session_id: Uuid,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
    operation: impl FnOnce(&mut ProgressionEngine) -> Result<(), DomainError>,
) -> Result<SessionCommandResult, DomainError> {
    debug!(
        %session_id,
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        "executing session command"
    );
    let command_lock = registry.command_lock(session_id)?;
    let _serialized = command_lock.lock().await;

    let events = registry.with_session(session_id, |engine| {
        operation(engine)?;
        let events = engine.uncommitted_events().to_vec();
        engine.clear_uncommitted_events();
        Ok(events)
    })?;

    let stored_events: Vec<StoredEvent> = events.iter().map(to_stored_event).collect();
    if let Err(e) = repo.append_events(session_id, &stored_events).await {
        warn!(%session_id, error = %e, "failed to append session events");
        return Err(e);
    }

    Ok(SessionCommandResult {
        session_id,
        events: events.into_iter().map(|e| e.kind).collect(),
        stored_events,
    })
}

/// Registers a new `NotStarted` session over `catalog`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the registry lock is poisoned.
pub fn handle_create_session(
    catalog: Arc<ScenarioCatalog>,
    registry: &SessionRegistry,
) -> Result<Uuid, DomainError> {
    let session_id = registry.create(catalog)?;
    info!(%session_id, "session created");
    Ok(session_id)
}

/// Handles the `StartSession` command.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound`, `DomainError::InvalidState` if the
/// session was already started, or `DomainError::Infrastructure` if the
/// append fails.
pub async fn handle_start_session(
    command: &StartSession,
    clock: &dyn Clock,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let result = execute(command, command.session_id, registry, repo, |engine| {
        engine.start(command.correlation_id, clock)
    })
    .await?;
    info!(session_id = %command.session_id, "session started");
    Ok(result)
}

/// Handles the `SubmitChoice` command.
///
/// # Errors
///
/// Returns `DomainError::UnknownChoice` if the current scenario has no such
/// choice, `DomainError::InvalidState` outside `InProgress`, plus the errors
/// of [`handle_start_session`].
pub async fn handle_submit_choice(
    command: &SubmitChoice,
    clock: &dyn Clock,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let result = execute(command, command.session_id, registry, repo, |engine| {
        engine.submit_choice(&command.choice_id, command.correlation_id, clock)
    })
    .await?;
    debug!(
        session_id = %command.session_id,
        choice_id = %command.choice_id,
        events = result.events.len(),
        "choice submitted"
    );
    if result
        .events
        .iter()
        .any(|e| matches!(e, DisplayEvent::SequenceCompleted(_)))
    {
        info!(session_id = %command.session_id, "scenario sequence completed");
    }
    Ok(result)
}

/// Handles the `RecordOversightAction` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` before the session has started, plus
/// the errors of [`handle_start_session`].
pub async fn handle_record_oversight_action(
    command: &RecordOversightAction,
    clock: &dyn Clock,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let result = execute(command, command.session_id, registry, repo, |engine| {
        engine.record_oversight_action(command.action, command.correlation_id, clock)
    })
    .await?;
    info!(session_id = %command.session_id, action = ?command.action, "oversight action recorded");
    Ok(result)
}

/// Handles the `ResetSession` command. Valid in every phase.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` or `DomainError::Infrastructure`.
pub async fn handle_reset_session(
    command: &ResetSession,
    clock: &dyn Clock,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let result = execute(command, command.session_id, registry, repo, |engine| {
        engine.reset(command.correlation_id, clock);
        Ok(())
    })
    .await?;
    info!(session_id = %command.session_id, "session reset");
    Ok(result)
}

/// Handles the `AcceptDisclaimer` command. Valid in every phase.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` or `DomainError::Infrastructure`.
pub async fn handle_accept_disclaimer(
    command: &AcceptDisclaimer,
    clock: &dyn Clock,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let result = execute(command, command.session_id, registry, repo, |engine| {
        engine.accept_disclaimer(command.correlation_id, clock);
        Ok(())
    })
    .await?;
    info!(session_id = %command.session_id, "disclaimer accepted");
    Ok(result)
}

/// Handles the `SubmitFeedback` command. Valid in every phase.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an overlong answer, plus the errors
/// of [`handle_accept_disclaimer`].
pub async fn handle_submit_feedback(
    command: &SubmitFeedback,
    clock: &dyn Clock,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
) -> Result<SessionCommandResult, DomainError> {
    let result = execute(command, command.session_id, registry, repo, |engine| {
        engine.submit_feedback(command.feedback.clone(), command.correlation_id, clock)
    })
    .await?;
    info!(
        session_id = %command.session_id,
        feedback_type = command.feedback.kind(),
        "feedback recorded"
    );
    if let Some(concern) = command.feedback.concern() {
        warn!(session_id = %command.session_id, ?concern, "compliance concern flagged");
    }
    Ok(result)
}

/// Handles the `EndSession` command: builds the final report, then drops the
/// engine, its event log, and its settings.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` for an unknown id, or
/// `DomainError::Infrastructure` if a store cannot be cleared. The engine is
/// already gone in the latter case.
pub async fn handle_end_session(
    command: &EndSession,
    clock: &dyn Clock,
    registry: &SessionRegistry,
    repo: &dyn EventRepository,
    settings: &dyn SettingsStore,
) -> Result<SessionReport, DomainError> {
    let session_id = command.session_id;
    debug!(
        %session_id,
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        "executing session command"
    );
    let command_lock = registry.command_lock(session_id)?;
    let _serialized = command_lock.lock().await;

    let report = get_session_report(session_id, registry, clock)?;
    registry.remove(session_id)?;

    let removed_events = repo.remove_events(session_id).await.inspect_err(|e| {
        warn!(%session_id, error = %e, "failed to drop session event log");
    })?;
    settings.clear(session_id).await.inspect_err(|e| {
        warn!(%session_id, error = %e, "failed to drop session settings");
    })?;

    info!(%session_id, removed_events, "session ended");
    Ok(report)
}
