//! Meal Plan tools
//!
//! Weekly meal templates with per-day breakfast, lunch and dinner slots.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Goal, MealPlan, MealPlanCreate, MealSlot};
use crate::tools::reports::{range_end, WEEK_DAYS};
use crate::tools::users::require_user;
use crate::validation;

/// Shown for a slot nobody has filled in
pub const EMPTY_SLOT: &str = "-";

/// Daily target assumed for snack suggestions when the user has no goal
pub const DEFAULT_DAILY_TARGET: i64 = 2000;

/// One day of a rendered plan
#[derive(Debug, Serialize, PartialEq)]
pub struct PlanRow {
    pub date: NaiveDate,
    pub weekday: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

/// Response for meal_plan
#[derive(Debug, Serialize)]
pub struct MealPlanView {
    pub user: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created: bool,
    pub rows: Vec<PlanRow>,
    pub snack_calories: i64,
}

/// Create a plan for `(user_id, start_date)` unless one already exists.
///
/// Returns the plan and whether it was newly created.
pub fn create_plan(
    conn: &Connection,
    user_id: i64,
    start_date: NaiveDate,
    days: u64,
) -> AppResult<(MealPlan, bool)> {
    if days == 0 {
        return Err(AppError::Validation("a meal plan must span at least one day".to_string()));
    }

    if let Some(existing) = MealPlan::get_for_user_start(conn, user_id, start_date)? {
        tracing::warn!(user_id, start = %start_date, "plan already exists for this week");
        return Ok((existing, false));
    }

    let plan = MealPlan::create(conn, &MealPlanCreate {
        user_id,
        start_date,
        end_date: range_end(start_date, days)?,
    })?;

    Ok((plan, true))
}

/// One row per date in the plan, with placeholders for empty slots
pub fn plan_rows(plan: &MealPlan) -> Vec<PlanRow> {
    plan.start_date
        .iter_days()
        .take_while(|d| *d <= plan.end_date)
        .map(|date| {
            let slot = |s: MealSlot| plan.meal(date, s).unwrap_or(EMPTY_SLOT).to_string();
            PlanRow {
                date,
                weekday: date.format("%A").to_string(),
                breakfast: slot(MealSlot::Breakfast),
                lunch: slot(MealSlot::Lunch),
                dinner: slot(MealSlot::Dinner),
            }
        })
        .collect()
}

/// Suggested snack size: a tenth of the daily target
pub fn snack_suggestion(goal: Option<&Goal>) -> i64 {
    goal.map(|g| g.daily_calories).unwrap_or(DEFAULT_DAILY_TARGET) / 10
}

fn view(conn: &Connection, user_name: String, plan: MealPlan, created: bool) -> AppResult<MealPlanView> {
    let goal = Goal::get_for_user(conn, plan.user_id)?;

    Ok(MealPlanView {
        user: user_name,
        start_date: plan.start_date,
        end_date: plan.end_date,
        created,
        rows: plan_rows(&plan),
        snack_calories: snack_suggestion(goal.as_ref()),
    })
}

/// Create the week's plan if needed and return it for display
pub fn meal_plan(
    db: &Database,
    user_name: &str,
    week_start: NaiveDate,
    days: Option<u64>,
) -> AppResult<MealPlanView> {
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;

    let (plan, created) = create_plan(&conn, user.id, week_start, days.unwrap_or(WEEK_DAYS))?;
    view(&conn, user.name, plan, created)
}

/// Fill one slot of an existing plan
pub fn set_meal(
    db: &Database,
    user_name: &str,
    week_start: NaiveDate,
    date: NaiveDate,
    slot: MealSlot,
    description: &str,
) -> AppResult<MealPlanView> {
    let description = validation::required_text("meal description", description)?;

    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;

    let plan = MealPlan::get_for_user_start(&conn, user.id, week_start)?.ok_or_else(|| {
        AppError::PlanNotFound {
            user: user.name.clone(),
            start: week_start,
        }
    })?;

    if !plan.covers(date) {
        return Err(AppError::Validation(format!(
            "{} is outside the plan {} to {}",
            date, plan.start_date, plan.end_date
        )));
    }

    let plan = MealPlan::set_meal(&conn, plan.id, date, slot, &description)?.ok_or_else(|| {
        AppError::PlanNotFound {
            user: user.name.clone(),
            start: week_start,
        }
    })?;

    view(&conn, user.name, plan, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use crate::tools::goals::set_goal;
    use crate::tools::users::create_user;

    fn jan(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_create_plan_is_idempotent() {
        let db = test_database();
        let user = create_user(&db, "alice").unwrap();
        let conn = db.get_conn().unwrap();

        let (first, created) = create_plan(&conn, user.id, jan(1), 7).unwrap();
        assert!(created);
        assert_eq!(first.end_date, jan(7));

        let (second, created) = create_plan(&conn, user.id, jan(1), 3).unwrap();
        assert!(!created);
        assert_eq!(second, first);
    }

    #[test]
    fn test_create_plan_rejects_zero_days() {
        let db = test_database();
        let user = create_user(&db, "alice").unwrap();
        let conn = db.get_conn().unwrap();

        assert!(matches!(create_plan(&conn, user.id, jan(1), 0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_plan_rows_use_placeholders() {
        let db = test_database();
        create_user(&db, "alice").unwrap();

        let view = meal_plan(&db, "alice", jan(1), None).unwrap();
        assert!(view.created);
        assert_eq!(view.rows.len(), 7);
        // 2024-01-01 was a Monday
        assert_eq!(view.rows[0].weekday, "Monday");
        assert_eq!(view.rows[6].weekday, "Sunday");
        assert!(view.rows.iter().all(|r| r.breakfast == EMPTY_SLOT && r.dinner == EMPTY_SLOT));
    }

    #[test]
    fn test_set_meal_fills_one_slot() {
        let db = test_database();
        create_user(&db, "alice").unwrap();
        meal_plan(&db, "alice", jan(1), None).unwrap();

        let view = set_meal(&db, "alice", jan(1), jan(2), MealSlot::Dinner, "salmon").unwrap();
        assert_eq!(view.rows[1].dinner, "salmon");
        assert_eq!(view.rows[1].lunch, EMPTY_SLOT);

        assert!(matches!(
            set_meal(&db, "alice", jan(1), jan(9), MealSlot::Lunch, "soup"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            set_meal(&db, "alice", jan(8), jan(9), MealSlot::Lunch, "soup"),
            Err(AppError::PlanNotFound { .. })
        ));
    }

    #[test]
    fn test_snack_suggestion() {
        let db = test_database();
        create_user(&db, "alice").unwrap();

        assert_eq!(meal_plan(&db, "alice", jan(1), None).unwrap().snack_calories, 200);

        set_goal(&db, "alice", 1800, 12600).unwrap();
        assert_eq!(meal_plan(&db, "alice", jan(1), None).unwrap().snack_calories, 180);
    }
}
