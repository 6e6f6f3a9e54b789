//! User model
//!
//! Account that owns food entries, a goal and meal plans.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Data for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
}

/// Data for updating a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
}

impl User {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new user
    pub fn create(conn: &Connection, data: &UserCreate) -> DbResult<Self> {
        conn.execute("INSERT INTO users (name) VALUES (?1)", params![data.name])?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, name = %data.name, "created user");
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE name = ?1")?;

        let result = stmt.query_row([name], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all users ordered by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY name")?;

        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Rename a user
    pub fn update(conn: &Connection, id: i64, data: &UserUpdate) -> DbResult<Option<Self>> {
        if let Some(ref name) = data.name {
            conn.execute("UPDATE users SET name = ?1 WHERE id = ?2", params![name, id])?;
        }

        Self::get_by_id(conn, id)
    }

    /// Delete a user; entries, goal and meal plans cascade
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
