//! Food Entry tools
//!
//! Logging, listing, editing and removing food entries.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{FoodEntry, FoodEntryCreate, FoodEntryUpdate, User};
use crate::tools::users::require_user;
use crate::validation;

/// Entry row with the owner's name, for listings
#[derive(Debug, Serialize)]
pub struct EntryRow {
    pub id: i64,
    pub user: String,
    pub food: String,
    pub calories: i64,
    pub date: NaiveDate,
}

/// Response for add_entry
#[derive(Debug, Serialize)]
pub struct AddEntryResponse {
    pub id: i64,
    pub user: String,
    pub food: String,
    pub calories: i64,
    pub date: NaiveDate,
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Log a food entry; `date` defaults to today
pub fn add_entry(
    db: &Database,
    user_name: &str,
    food: &str,
    calories: i64,
    date: Option<NaiveDate>,
) -> AppResult<AddEntryResponse> {
    let food = validation::required_text("food", food)?;
    let calories = validation::calories("calories", calories)?;
    let date = date.unwrap_or_else(today);

    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;

    let entry = FoodEntry::create(&conn, &FoodEntryCreate {
        user_id: user.id,
        food,
        calories,
        date,
    })?;

    Ok(AddEntryResponse {
        id: entry.id,
        user: user.name,
        food: entry.food,
        calories: entry.calories,
        date: entry.date,
    })
}

/// List entries, optionally filtered by user and date
pub fn list_entries(
    db: &Database,
    user_name: Option<&str>,
    date: Option<NaiveDate>,
) -> AppResult<Vec<EntryRow>> {
    let conn = db.get_conn()?;

    let user_id = match user_name {
        Some(name) => Some(require_user(&conn, name)?.id),
        None => None,
    };

    let names: HashMap<i64, String> = User::list(&conn)?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let rows = FoodEntry::list(&conn, user_id, date)?
        .into_iter()
        .map(|e| EntryRow {
            id: e.id,
            user: names.get(&e.user_id).cloned().unwrap_or_default(),
            food: e.food,
            calories: e.calories,
            date: e.date,
        })
        .collect();

    Ok(rows)
}

/// Get a single entry
pub fn get_entry(db: &Database, id: i64) -> AppResult<FoodEntry> {
    let conn = db.get_conn()?;
    FoodEntry::get_by_id(&conn, id)?.ok_or(AppError::EntryNotFound(id))
}

/// Apply a partial update to an entry
pub fn update_entry(db: &Database, id: i64, patch: FoodEntryUpdate) -> AppResult<FoodEntry> {
    if patch.is_empty() {
        return Err(AppError::Validation(
            "nothing to update; pass --food, --calories or --date".to_string(),
        ));
    }

    let patch = FoodEntryUpdate {
        food: patch
            .food
            .map(|f| validation::required_text("food", &f))
            .transpose()?,
        calories: patch
            .calories
            .map(|c| validation::calories("calories", c))
            .transpose()?,
        date: patch.date,
    };

    let conn = db.get_conn()?;
    FoodEntry::update(&conn, id, &patch)?.ok_or(AppError::EntryNotFound(id))
}

/// Delete an entry, returning what was removed
pub fn delete_entry(db: &Database, id: i64) -> AppResult<FoodEntry> {
    let conn = db.get_conn()?;
    let entry = FoodEntry::get_by_id(&conn, id)?.ok_or(AppError::EntryNotFound(id))?;

    if !FoodEntry::delete(&conn, id)? {
        return Err(AppError::EntryNotFound(id));
    }
    tracing::info!(id, "deleted food entry");

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::tools::users::create_user;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn entry_count(db: &Database) -> i64 {
        let conn = db.get_conn().unwrap();
        conn.query_row("SELECT COUNT(*) FROM food_entries", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_add_entry_for_unknown_user_writes_nothing() {
        let db = test_database();
        let err = add_entry(&db, "ghost", "eggs", 300, Some(jan(1))).unwrap_err();

        assert!(matches!(err, AppError::UserNotFound(_)));
        assert_eq!(entry_count(&db), 0);
    }

    #[test]
    fn test_add_entry_validates_input() {
        let db = test_database();
        create_user(&db, "alice").unwrap();

        assert!(matches!(add_entry(&db, "alice", "eggs", -5, None), Err(AppError::Validation(_))));
        assert!(matches!(add_entry(&db, "alice", " ", 100, None), Err(AppError::Validation(_))));
        assert_eq!(entry_count(&db), 0);
    }

    #[test]
    fn test_add_entry_defaults_to_today() {
        let db = test_database();
        create_user(&db, "alice").unwrap();

        let added = add_entry(&db, "alice", "eggs", 300, None).unwrap();
        assert_eq!(added.date, today());
    }

    #[test]
    fn test_list_entries_filters() {
        let db = test_database();
        create_user(&db, "alice").unwrap();
        create_user(&db, "bob").unwrap();
        add_entry(&db, "alice", "eggs", 300, Some(jan(1))).unwrap();
        add_entry(&db, "alice", "soup", 250, Some(jan(2))).unwrap();
        add_entry(&db, "bob", "pizza", 800, Some(jan(1))).unwrap();

        assert_eq!(list_entries(&db, None, None).unwrap().len(), 3);
        assert_eq!(list_entries(&db, None, Some(jan(1))).unwrap().len(), 2);

        let alice = list_entries(&db, Some("alice"), Some(jan(2))).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].user, "alice");
        assert_eq!(alice[0].food, "soup");

        assert!(matches!(list_entries(&db, Some("ghost"), None), Err(AppError::UserNotFound(_))));
    }

    #[test]
    fn test_update_entry() {
        let db = test_database();
        create_user(&db, "alice").unwrap();
        let added = add_entry(&db, "alice", "eggs", 300, Some(jan(1))).unwrap();

        let updated = update_entry(&db, added.id, FoodEntryUpdate {
            food: Some("scrambled eggs".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(updated.food, "scrambled eggs");
        assert_eq!(updated.calories, 300);

        assert!(matches!(
            update_entry(&db, added.id, FoodEntryUpdate::default()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            update_entry(&db, added.id, FoodEntryUpdate { calories: Some(-1), ..Default::default() }),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            update_entry(&db, 999, FoodEntryUpdate { calories: Some(1), ..Default::default() }),
            Err(AppError::EntryNotFound(999))
        ));
    }

    #[test]
    fn test_delete_missing_entry_is_not_found_and_mutates_nothing() {
        let db = test_database();
        create_user(&db, "alice").unwrap();
        add_entry(&db, "alice", "eggs", 300, Some(jan(1))).unwrap();

        assert!(matches!(delete_entry(&db, 999), Err(AppError::EntryNotFound(999))));
        assert_eq!(entry_count(&db), 1);
    }

    #[test]
    fn test_delete_entry() {
        let db = test_database();
        create_user(&db, "alice").unwrap();
        let added = add_entry(&db, "alice", "eggs", 300, Some(jan(1))).unwrap();

        let deleted = delete_entry(&db, added.id).unwrap();
        assert_eq!(deleted.food, "eggs");
        assert_eq!(entry_count(&db), 0);
        assert!(matches!(get_entry(&db, added.id), Err(AppError::EntryNotFound(_))));
    }
}
