//! Goal model
//!
//! Daily and weekly calorie targets, at most one row per user.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A user's calorie targets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub daily_calories: i64,
    pub weekly_calories: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for setting a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSet {
    pub user_id: i64,
    pub daily_calories: i64,
    pub weekly_calories: i64,
}

/// Data for updating a goal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalUpdate {
    pub daily_calories: Option<i64>,
    pub weekly_calories: Option<i64>,
}

impl Goal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            daily_calories: row.get("daily_calories")?,
            weekly_calories: row.get("weekly_calories")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Set or update a user's goal (upsert on user_id)
    pub fn upsert(conn: &Connection, data: &GoalSet) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO goals (user_id, daily_calories, weekly_calories)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                daily_calories = excluded.daily_calories,
                weekly_calories = excluded.weekly_calories,
                updated_at = datetime('now')
            "#,
            params![data.user_id, data.daily_calories, data.weekly_calories],
        )?;
        tracing::debug!(user_id = data.user_id, "upserted goal");

        Self::get_for_user(conn, data.user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a goal by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the goal belonging to a user
    pub fn get_for_user(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goals WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update only the targets set in `data`
    pub fn update(conn: &Connection, id: i64, data: &GoalUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(daily) = data.daily_calories {
            params_vec.push(Box::new(daily));
            updates.push(format!("daily_calories = ?{}", params_vec.len()));
        }
        if let Some(weekly) = data.weekly_calories {
            params_vec.push(Box::new(weekly));
            updates.push(format!("weekly_calories = ?{}", params_vec.len()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }
        updates.push("updated_at = datetime('now')".to_string());

        params_vec.push(Box::new(id));
        let sql = format!(
            "UPDATE goals SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len()
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a goal
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM goals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Count goal rows for a user (0 or 1)
    pub fn count_for_user(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM goals WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
