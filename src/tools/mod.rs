//! Command tools
//!
//! One function per CLI command. Each acquires a single pooled connection for
//! its duration.

pub mod dashboard;
pub mod entries;
pub mod goals;
pub mod meal_plans;
pub mod reports;
pub mod users;
