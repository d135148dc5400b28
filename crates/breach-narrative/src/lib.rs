//! Breach Protocol: Scenario Progression bounded context.
//!
//! Responsible for choice evaluation, score bookkeeping, objective unlocking,
//! and the start / advance / complete / reset state machine that walks a
//! learner through the scenario catalog.

pub mod application;
pub mod domain;
