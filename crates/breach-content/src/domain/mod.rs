//! Domain model for the Scenario Catalog context.

pub mod catalog;
pub mod scenario;
mod validation;
