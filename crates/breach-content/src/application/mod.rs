//! Application layer for the Scenario Catalog context.

pub mod query_handlers;
