//! Food Entry model
//!
//! A single logged food item with its calorie count.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A logged food item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub food: String,
    pub calories: i64,
    pub date: NaiveDate,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryCreate {
    pub user_id: i64,
    pub food: String,
    pub calories: i64,
    pub date: NaiveDate,
}

/// Data for updating a food entry; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodEntryUpdate {
    pub food: Option<String>,
    pub calories: Option<i64>,
    pub date: Option<NaiveDate>,
}

impl FoodEntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.food.is_none() && self.calories.is_none() && self.date.is_none()
    }
}

impl FoodEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food: row.get("food")?,
            calories: row.get("calories")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new food entry
    pub fn create(conn: &Connection, data: &FoodEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_entries (user_id, food, calories, date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.user_id, data.food, data.calories, data.date],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, user_id = data.user_id, calories = data.calories, "created food entry");
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all entries for a user
    pub fn get_by_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        Self::list(conn, Some(user_id), None)
    }

    /// Get a user's entries for one date
    pub fn get_by_date(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Vec<Self>> {
        Self::list(conn, Some(user_id), Some(date))
    }

    /// Get a user's entries between two dates, inclusive
    pub fn get_in_range(
        conn: &Connection,
        user_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_entries
            WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date, id
            "#,
        )?;

        let entries = stmt
            .query_map(params![user_id, start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// List entries with optional user and date filters
    pub fn list(
        conn: &Connection,
        user_id: Option<i64>,
        date: Option<NaiveDate>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM food_entries WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(user_id) = user_id {
            params_vec.push(Box::new(user_id));
            sql.push_str(&format!(" AND user_id = ?{}", params_vec.len()));
        }

        if let Some(date) = date {
            params_vec.push(Box::new(date));
            sql.push_str(&format!(" AND date = ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date, id");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Update only the fields set in `data`
    pub fn update(conn: &Connection, id: i64, data: &FoodEntryUpdate) -> DbResult<Option<Self>> {
        let Some(entry) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        if data.is_empty() {
            return Ok(Some(entry));
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref food) = data.food {
            params_vec.push(Box::new(food.clone()));
            updates.push(format!("food = ?{}", params_vec.len()));
        }
        if let Some(calories) = data.calories {
            params_vec.push(Box::new(calories));
            updates.push(format!("calories = ?{}", params_vec.len()));
        }
        if let Some(date) = data.date {
            params_vec.push(Box::new(date));
            updates.push(format!("date = ?{}", params_vec.len()));
        }

        updates.push("updated_at = datetime('now')".to_string());

        params_vec.push(Box::new(id));
        let sql = format!(
            "UPDATE food_entries SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len()
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;
        tracing::debug!(id, "updated food entry");

        Self::get_by_id(conn, id)
    }

    /// Delete a food entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

/// Sum calories over a set of entries; `None` on overflow
pub fn total_calories(entries: &[FoodEntry]) -> Option<i64> {
    entries.iter().try_fold(0i64, |acc, e| acc.checked_add(e.calories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::{User, UserCreate};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn entry(user_id: i64, food: &str, calories: i64, date: NaiveDate) -> FoodEntryCreate {
        FoodEntryCreate { user_id, food: food.into(), calories, date }
    }

    #[test]
    fn test_create_and_filter_by_date() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();

        FoodEntry::create(&conn, &entry(user.id, "eggs", 300, day(1))).unwrap();
        FoodEntry::create(&conn, &entry(user.id, "toast", 150, day(1))).unwrap();
        FoodEntry::create(&conn, &entry(user.id, "soup", 200, day(2))).unwrap();

        let jan1 = FoodEntry::get_by_date(&conn, user.id, day(1)).unwrap();
        assert_eq!(jan1.len(), 2);
        assert_eq!(total_calories(&jan1), Some(450));
        assert_eq!(FoodEntry::get_by_user(&conn, user.id).unwrap().len(), 3);
    }

    #[test]
    fn test_range_is_inclusive() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();

        for d in 1..=9 {
            FoodEntry::create(&conn, &entry(user.id, "apple", 100, day(d))).unwrap();
        }

        let week = FoodEntry::get_in_range(&conn, user.id, day(2), day(8)).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week.first().unwrap().date, day(2));
        assert_eq!(week.last().unwrap().date, day(8));
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();
        let created = FoodEntry::create(&conn, &entry(user.id, "eggs", 300, day(1))).unwrap();

        let patch = FoodEntryUpdate { calories: Some(320), ..Default::default() };
        let updated = FoodEntry::update(&conn, created.id, &patch).unwrap().unwrap();

        assert_eq!(updated.calories, 320);
        assert_eq!(updated.food, "eggs");
        assert_eq!(updated.date, day(1));
    }

    #[test]
    fn test_update_and_delete_missing_entry() {
        let db = test_database();
        let conn = db.get_conn().unwrap();

        let patch = FoodEntryUpdate { food: Some("x".into()), ..Default::default() };
        assert!(FoodEntry::update(&conn, 42, &patch).unwrap().is_none());
        assert!(!FoodEntry::delete(&conn, 42).unwrap());
    }

    #[test]
    fn test_total_calories_overflow_is_none() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();

        let big = FoodEntry::create(&conn, &entry(user.id, "feast", i64::MAX, day(1))).unwrap();
        let small = FoodEntry::create(&conn, &entry(user.id, "mint", 1, day(1))).unwrap();

        assert_eq!(total_calories(&[big.clone()]), Some(i64::MAX));
        assert_eq!(total_calories(&[big, small]), None);
        assert_eq!(total_calories(&[]), Some(0));
    }

    #[test]
    fn test_entry_requires_existing_user() {
        let db = test_database();
        let conn = db.get_conn().unwrap();

        assert!(FoodEntry::create(&conn, &entry(99, "eggs", 300, day(1))).is_err());
    }
}
