//! Domain model for the Scenario Progression context.

pub mod commands;
pub mod compliance;
pub mod engine;
pub mod evaluator;
pub mod events;
pub mod feedback;
pub mod metrics;
pub mod state;
