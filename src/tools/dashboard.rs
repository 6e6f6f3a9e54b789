//! Dashboard tool
//!
//! Goal progress for today and the current week alongside today's entries.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{total_calories, FoodEntry, Goal};
use crate::tools::goals::{check_progress, Target};
use crate::tools::meal_plans::snack_suggestion;
use crate::tools::users::require_user;

/// Response for dashboard
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: String,
    pub date: NaiveDate,
    pub today_total: i64,
    pub entries: Vec<FoodEntry>,
    pub daily: Option<Target>,
    pub week_start: NaiveDate,
    pub week_total: i64,
    pub weekly: Option<Target>,
    pub snack_calories: i64,
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Build the dashboard for `date` (normally today)
pub fn dashboard(db: &Database, user_name: &str, date: NaiveDate) -> AppResult<Dashboard> {
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;

    let entries = FoodEntry::get_by_date(&conn, user.id, date)?;
    let today_total = total_calories(&entries).ok_or(AppError::CalorieOverflow)?;

    let monday = week_start(date);
    let week_entries = FoodEntry::get_in_range(&conn, user.id, monday, date)?;
    let week_total = total_calories(&week_entries).ok_or(AppError::CalorieOverflow)?;

    let daily = check_progress(&conn, user.id, today_total)?.map(|p| p.daily);
    let weekly = check_progress(&conn, user.id, week_total)?.map(|p| p.weekly);
    let goal = Goal::get_for_user(&conn, user.id)?;

    Ok(Dashboard {
        user: user.name,
        date,
        today_total,
        entries,
        daily,
        week_start: monday,
        week_total,
        weekly,
        snack_calories: snack_suggestion(goal.as_ref()),
    })
}
