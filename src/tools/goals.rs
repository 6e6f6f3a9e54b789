//! Goal tools
//!
//! Setting calorie targets and comparing intake against them.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::Database;
use crate::error::AppResult;
use crate::models::{Goal, GoalSet};
use crate::tools::users::require_user;
use crate::validation;

/// One calorie target and what is left of it
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Target {
    pub target: i64,
    pub remaining: i64,
}

impl Target {
    /// Remaining is clamped at zero; overage is reported by [`Target::over_by`]
    pub fn evaluate(target: i64, current: i64) -> Self {
        Self {
            target,
            remaining: (target - current).max(0),
        }
    }

    /// How far `current` exceeds the target, if at all
    pub fn over_by(&self, current: i64) -> Option<i64> {
        (current > self.target).then(|| current - self.target)
    }
}

/// Daily and weekly progress against a goal
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Progress {
    pub daily: Target,
    pub weekly: Target,
}

impl Progress {
    pub fn from_goal(goal: &Goal, current_calories: i64) -> Self {
        Self {
            daily: Target::evaluate(goal.daily_calories, current_calories),
            weekly: Target::evaluate(goal.weekly_calories, current_calories),
        }
    }
}

/// Response for goal_list
#[derive(Debug, Serialize)]
pub struct GoalView {
    pub user: String,
    pub goal: Option<Goal>,
}

/// Compare intake against a user's goal; `None` when no goal is set
pub fn check_progress(
    conn: &Connection,
    user_id: i64,
    current_calories: i64,
) -> AppResult<Option<Progress>> {
    let goal = Goal::get_for_user(conn, user_id)?;
    Ok(goal.map(|g| Progress::from_goal(&g, current_calories)))
}

/// Create or replace a user's goal
pub fn set_goal(db: &Database, user_name: &str, daily: i64, weekly: i64) -> AppResult<Goal> {
    let daily = validation::calories("daily goal", daily)?;
    let weekly = validation::calories("weekly goal", weekly)?;

    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;

    if weekly < daily {
        tracing::warn!(user = %user.name, daily, weekly, "weekly goal is lower than daily goal");
    }

    Ok(Goal::upsert(&conn, &GoalSet {
        user_id: user.id,
        daily_calories: daily,
        weekly_calories: weekly,
    })?)
}

/// Show a user's goal, if any
pub fn list_goal(db: &Database, user_name: &str) -> AppResult<GoalView> {
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_name)?;
    let goal = Goal::get_for_user(&conn, user.id)?;

    Ok(GoalView { user: user.name, goal })
}
