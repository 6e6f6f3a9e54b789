//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        // schema and version row commit together or not at all
        let tx = conn.unchecked_transaction()?;
        migrate_v1(&tx)?;
        tx.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tx.commit()?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE CHECK(length(trim(name)) > 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD ENTRIES
        -- One logged food item per row
        -- ============================================
        CREATE TABLE food_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            food TEXT NOT NULL CHECK(length(trim(food)) > 0),
            calories INTEGER NOT NULL CHECK(calories >= 0),
            date TEXT NOT NULL,                  -- ISO date: "2024-01-01"
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_entries_user_date ON food_entries(user_id, date);
        CREATE INDEX idx_food_entries_date ON food_entries(date);

        -- ============================================
        -- GOALS
        -- At most one row per user
        -- ============================================
        CREATE TABLE goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            daily_calories INTEGER NOT NULL CHECK(daily_calories >= 0),
            weekly_calories INTEGER NOT NULL CHECK(weekly_calories >= 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MEAL PLANS
        -- meals: JSON object {"2024-01-01": {"breakfast": "..."}}
        -- ============================================
        CREATE TABLE meal_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            meals TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, start_date),
            CHECK (end_date >= start_date)
        );

        CREATE INDEX idx_meal_plans_user ON meal_plans(user_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_failed_migration_leaves_no_partial_schema() {
        let conn = Connection::open_in_memory().unwrap();
        // a pre-existing table makes the last CREATE TABLE fail
        conn.execute("CREATE TABLE meal_plans (id INTEGER PRIMARY KEY)", []).unwrap();

        assert!(run_migrations(&conn).is_err());
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
        let users: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(users, 0);

        conn.execute("DROP TABLE meal_plans", []).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["users", "food_entries", "goals", "meal_plans"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }
}
