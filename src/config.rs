//! Runtime configuration
//!
//! Resolved from `HEALTH_CLI_*` environment variables, with the database path
//! overridable from the command line.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub const ENV_DATABASE_PATH: &str = "HEALTH_CLI_DATABASE_PATH";
pub const ENV_POOL_SIZE: &str = "HEALTH_CLI_POOL_SIZE";
pub const ENV_LOG: &str = "HEALTH_CLI_LOG";

const DATA_DIR: &str = ".health_cli";
const DATABASE_FILE: &str = "health_tracker.db";
const DEFAULT_POOL_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub pool_size: u32,
    pub log_filter: Option<String>,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup, so tests need not touch
    /// the process environment
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(ENV_DATABASE_PATH) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path(lookup("HOME").as_deref()),
        };

        let pool_size = match lookup(ENV_POOL_SIZE) {
            Some(raw) => parse_pool_size(&raw)?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_path,
            pool_size,
            log_filter: lookup(ENV_LOG).filter(|f| !f.trim().is_empty()),
        })
    }

    /// Replace the database path when one was given on the command line
    pub fn with_database_override(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.database_path = path;
        }
        self
    }

    /// Create the directory that holds the database file
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

fn default_database_path(home: Option<&str>) -> PathBuf {
    let base = home.map(Path::new).unwrap_or_else(|| Path::new("."));
    base.join(DATA_DIR).join(DATABASE_FILE)
}

fn parse_pool_size(raw: &str) -> AppResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::Validation(format!(
            "{} must be a positive integer, got '{}'",
            ENV_POOL_SIZE, raw
        ))),
    }
}
