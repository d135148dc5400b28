//! Application layer for the Scenario Progression context.

pub mod command_handlers;
pub mod query_handlers;
pub mod registry;
