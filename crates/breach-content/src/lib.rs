//! Breach Protocol: Scenario Catalog bounded context.
//!
//! Responsible for the authored scenario schema, YAML ingestion, load-time
//! validation of choice cross-references, and catalog version hashing.

pub mod application;
pub mod domain;
