//! Route modules organized by bounded context.

pub mod ai;
pub mod health;
pub mod scenarios;
pub mod sessions;
