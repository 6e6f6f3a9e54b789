//! health-cli Library
//!
//! Core functionality for the personal nutrition tracker: users, food
//! entries, calorie goals, reports and meal plans on top of SQLite.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod render;
pub mod tools;
pub mod validation;

pub use error::{AppError, AppResult};
