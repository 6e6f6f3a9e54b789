//! Report tools
//!
//! Daily and weekly calorie summaries.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{total_calories, FoodEntry, Goal};
use crate::tools::users::require_user;

/// Days in a weekly summary, inclusive of both ends
pub const WEEK_DAYS: u64 = 7;

/// Intake relative to the daily goal
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "status", content = "by", rename_all = "lowercase")]
pub enum GoalStatus {
    Under,
    Over(i64),
}

impl GoalStatus {
    /// `Under` when total is at or below target
    pub fn evaluate(total: i64, target: i64) -> Self {
        if total <= target {
            GoalStatus::Under
        } else {
            GoalStatus::Over(total - target)
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Under => write!(f, "Under"),
            GoalStatus::Over(by) => write!(f, "Over by {}", by),
        }
    }
}

/// Response for daily_report
#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub user: String,
    pub date: NaiveDate,
    pub total_calories: i64,
    pub entries: Vec<FoodEntry>,
    pub goal: Option<i64>,
    pub status: Option<GoalStatus>,
    pub percent_of_goal: Option<i64>,
}

/// Response for weekly_summary
#[derive(Debug, Serialize)]
pub struct WeeklySummary {
    pub user: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub daily_totals: BTreeMap<NaiveDate, i64>,
    pub weekly_total: i64,
    pub weekly_goal: Option<i64>,
}

/// Integer percentage of the daily target consumed
pub fn percent_of_goal(total: i64, target: i64) -> AppResult<i64> {
    if target == 0 {
        return Err(AppError::ZeroTarget);
    }
    total
        .checked_mul(100)
        .map(|scaled| scaled / target)
        .ok_or(AppError::CalorieOverflow)
}

/// Last day of the range starting at `start`
pub(crate) fn range_end(start: NaiveDate, days: u64) -> AppResult<NaiveDate> {
    start
        .checked_add_days(Days::new(days.saturating_sub(1)))
        .ok_or_else(|| AppError::Validation(format!("date range from {} is out of bounds", start)))
}

/// Sum calories per day for every date in `start..=end`, zero-filling empty days
pub fn daily_totals(
    entries: &[FoodEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<BTreeMap<NaiveDate, i64>> {
    let mut totals: BTreeMap<NaiveDate, i64> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d, 0))
        .collect();

    for entry in entries {
        if let Some(total) = totals.get_mut(&entry.date) {
            *total = total
                .checked_add(entry.calories)
                .ok_or(AppError::CalorieOverflow)?;
        }
    }

    Ok(totals)
}

/// Total calories, entries and goal status for one day
pub fn daily_report(db: &Database, user_name: &str, date: NaiveDate) -> AppResult<DailyReport> {
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;

    let entries = FoodEntry::get_by_date(&conn, user.id, date)?;
    let total = total_calories(&entries).ok_or(AppError::CalorieOverflow)?;
    let goal = Goal::get_for_user(&conn, user.id)?;

    let (status, percent) = match &goal {
        Some(g) => (
            Some(GoalStatus::evaluate(total, g.daily_calories)),
            Some(percent_of_goal(total, g.daily_calories)?),
        ),
        None => (None, None),
    };

    Ok(DailyReport {
        user: user.name,
        date,
        total_calories: total,
        entries,
        goal: goal.map(|g| g.daily_calories),
        status,
        percent_of_goal: percent,
    })
}

/// Per-day totals for the seven days starting at `start_date`
pub fn weekly_summary(
    db: &Database,
    user_name: &str,
    start_date: NaiveDate,
) -> AppResult<WeeklySummary> {
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;

    let end_date = range_end(start_date, WEEK_DAYS)?;
    let entries = FoodEntry::get_in_range(&conn, user.id, start_date, end_date)?;
    let totals = daily_totals(&entries, start_date, end_date)?;
    let weekly_total = totals
        .values()
        .try_fold(0i64, |acc, t| acc.checked_add(*t))
        .ok_or(AppError::CalorieOverflow)?;
    let goal = Goal::get_for_user(&conn, user.id)?;

    Ok(WeeklySummary {
        user: user.name,
        week_start: start_date,
        week_end: end_date,
        daily_totals: totals,
        weekly_total,
        weekly_goal: goal.map(|g| g.weekly_calories),
    })
}
