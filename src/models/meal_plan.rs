//! Meal Plan model
//!
//! A date range with free-text descriptions per meal slot. The per-date
//! meals are stored as a JSON object in a single column.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Meal slot within a planned day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealSlot::Breakfast),
            "lunch" => Some(MealSlot::Lunch),
            "dinner" => Some(MealSlot::Dinner),
            _ => None,
        }
    }
}

/// Meals for one day, keyed by slot
pub type DayMeals = BTreeMap<MealSlot, String>;

/// A meal plan covering `start_date..=end_date`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlan {
    pub id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub meals: BTreeMap<NaiveDate, DayMeals>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanCreate {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Data for updating a meal plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPlanUpdate {
    pub end_date: Option<NaiveDate>,
    pub meals: Option<BTreeMap<NaiveDate, DayMeals>>,
}

impl MealPlan {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meals_json: String = row.get("meals")?;
        let meals = serde_json::from_str(&meals_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            meals,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Whether `date` falls inside the plan
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Description for one slot, if filled
    pub fn meal(&self, date: NaiveDate, slot: MealSlot) -> Option<&str> {
        self.meals
            .get(&date)
            .and_then(|day| day.get(&slot))
            .map(String::as_str)
    }

    /// Create a new meal plan with no meals filled
    pub fn create(conn: &Connection, data: &MealPlanCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meal_plans (user_id, start_date, end_date, meals)
            VALUES (?1, ?2, ?3, '{}')
            "#,
            params![data.user_id, data.start_date, data.end_date],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, user_id = data.user_id, start = %data.start_date, "created meal plan");
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a meal plan by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_plans WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the plan a user has starting on `start_date`
    pub fn get_for_user_start(
        conn: &Connection,
        user_id: i64,
        start_date: NaiveDate,
    ) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_plans WHERE user_id = ?1 AND start_date = ?2",
        )?;

        let result = stmt.query_row(params![user_id, start_date], Self::from_row);
        match result {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all plans for a user, newest first
    pub fn get_by_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_plans WHERE user_id = ?1 ORDER BY start_date DESC",
        )?;

        let plans = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    /// Get a user's plans whose range contains `date`
    pub fn get_by_date(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meal_plans
            WHERE user_id = ?1 AND start_date <= ?2 AND end_date >= ?2
            ORDER BY start_date
            "#,
        )?;

        let plans = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    /// Update a meal plan
    pub fn update(conn: &Connection, id: i64, data: &MealPlanUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(end_date) = data.end_date {
            params_vec.push(Box::new(end_date));
            updates.push(format!("end_date = ?{}", params_vec.len()));
        }
        if let Some(ref meals) = data.meals {
            params_vec.push(Box::new(serde_json::to_string(meals)?));
            updates.push(format!("meals = ?{}", params_vec.len()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }
        updates.push("updated_at = datetime('now')".to_string());

        params_vec.push(Box::new(id));
        let sql = format!(
            "UPDATE meal_plans SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len()
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Fill one meal slot
    pub fn set_meal(
        conn: &Connection,
        id: i64,
        date: NaiveDate,
        slot: MealSlot,
        description: &str,
    ) -> DbResult<Option<Self>> {
        let Some(plan) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        let mut meals = plan.meals;
        meals
            .entry(date)
            .or_default()
            .insert(slot, description.to_string());

        Self::update(conn, id, &MealPlanUpdate {
            meals: Some(meals),
            ..Default::default()
        })
    }

    /// Delete a meal plan
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_plans WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::models::{User, UserCreate};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_meal_slot_parse() {
        assert_eq!(MealSlot::parse("Lunch"), Some(MealSlot::Lunch));
        assert_eq!(MealSlot::parse("brunch"), None);
        assert_eq!(MealSlot::Dinner.as_str(), "dinner");
    }

    #[test]
    fn test_meals_round_trip_through_json_column() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();

        let plan = MealPlan::create(&conn, &MealPlanCreate {
            user_id: user.id,
            start_date: day(1),
            end_date: day(7),
        })
        .unwrap();
        assert!(plan.meals.is_empty());

        let plan = MealPlan::set_meal(&conn, plan.id, day(3), MealSlot::Lunch, "lentil soup")
            .unwrap()
            .unwrap();
        assert_eq!(plan.meal(day(3), MealSlot::Lunch), Some("lentil soup"));
        assert_eq!(plan.meal(day(3), MealSlot::Dinner), None);

        let stored: String = conn
            .query_row("SELECT meals FROM meal_plans WHERE id = ?1", [plan.id], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, r#"{"2024-01-03":{"lunch":"lentil soup"}}"#);
    }

    #[test]
    fn test_one_plan_per_user_and_start_date() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();
        let data = MealPlanCreate { user_id: user.id, start_date: day(1), end_date: day(7) };

        MealPlan::create(&conn, &data).unwrap();
        assert!(MealPlan::create(&conn, &data).unwrap_err().is_unique_violation());
    }

    #[test]
    fn test_get_by_date_matches_covering_plans() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();
        MealPlan::create(&conn, &MealPlanCreate { user_id: user.id, start_date: day(1), end_date: day(7) }).unwrap();
        MealPlan::create(&conn, &MealPlanCreate { user_id: user.id, start_date: day(8), end_date: day(14) }).unwrap();

        let covering = MealPlan::get_by_date(&conn, user.id, day(7)).unwrap();
        assert_eq!(covering.len(), 1);
        assert!(covering[0].covers(day(7)));
        assert_eq!(MealPlan::get_by_user(&conn, user.id).unwrap().len(), 2);
    }

    #[test]
    fn test_rejected_update_keeps_meals() {
        let db = test_database();
        let conn = db.get_conn().unwrap();
        let user = User::create(&conn, &UserCreate { name: "alice".into() }).unwrap();
        let plan = MealPlan::create(&conn, &MealPlanCreate { user_id: user.id, start_date: day(8), end_date: day(14) }).unwrap();

        let mut meals = BTreeMap::new();
        meals.entry(day(9)).or_insert_with(DayMeals::new).insert(MealSlot::Dinner, "curry".to_string());
        // end before start violates the range check
        let patch = MealPlanUpdate { end_date: Some(day(1)), meals: Some(meals) };
        assert!(MealPlan::update(&conn, plan.id, &patch).is_err());

        let stored = MealPlan::get_by_id(&conn, plan.id).unwrap().unwrap();
        assert_eq!(stored.end_date, day(14));
        assert!(stored.meals.is_empty());
    }
}
