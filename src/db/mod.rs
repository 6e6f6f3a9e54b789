//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Conn, Database, DbError, DbResult};

/// Open a migrated in-memory database for tests
#[cfg(test)]
pub(crate) fn test_database() -> Database {
    let db = Database::in_memory().expect("in-memory pool");
    db.with_conn(migrations::run_migrations).expect("migrations");
    db
}
