//! User tools
//!
//! Registration, listing and removal of users.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{FoodEntry, Goal, MealPlan, User, UserCreate};
use crate::validation;

/// User summary for listing
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub entry_count: usize,
    pub has_goal: bool,
    pub created_at: String,
}

/// Response for delete_user
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub id: i64,
    pub name: String,
    pub entries_removed: usize,
    pub goal_removed: bool,
    pub meal_plans_removed: usize,
}

/// Look up a user by name, failing with `UserNotFound`
pub(crate) fn require_user(conn: &Connection, name: &str) -> AppResult<User> {
    User::get_by_name(conn, name.trim())?
        .ok_or_else(|| AppError::UserNotFound(name.to_string()))
}

/// Register a new user
pub fn create_user(db: &Database, name: &str) -> AppResult<User> {
    let name = validation::required_text("user name", name)?;
    let conn = db.get_conn()?;

    match User::create(&conn, &UserCreate { name: name.clone() }) {
        Ok(user) => Ok(user),
        Err(e) if e.is_unique_violation() => {
            Err(AppError::Validation(format!("user '{}' already exists", name)))
        }
        Err(e) => Err(e.into()),
    }
}

/// List users with entry counts
pub fn list_users(db: &Database) -> AppResult<Vec<UserSummary>> {
    let conn = db.get_conn()?;

    let mut summaries = Vec::new();
    for user in User::list(&conn)? {
        let entry_count = FoodEntry::get_by_user(&conn, user.id)?.len();
        let has_goal = Goal::get_for_user(&conn, user.id)?.is_some();

        summaries.push(UserSummary {
            id: user.id,
            name: user.name,
            entry_count,
            has_goal,
            created_at: user.created_at,
        });
    }

    Ok(summaries)
}

/// Delete a user together with their entries, goal and meal plans
pub fn delete_user(db: &Database, name: &str) -> AppResult<DeleteUserResponse> {
    let conn = db.get_conn()?;
    let user = require_user(&conn, name)?;
    remove_user(&conn, user)
}

/// Resolve the user, then delete only if `confirm` approves.
/// Returns `Ok(None)` when declined; an unknown name fails before `confirm` runs.
pub fn delete_user_confirmed<F>(
    db: &Database,
    name: &str,
    confirm: F,
) -> AppResult<Option<DeleteUserResponse>>
where
    F: FnOnce(&User) -> AppResult<bool>,
{
    let conn = db.get_conn()?;
    let user = require_user(&conn, name)?;

    if !confirm(&user)? {
        tracing::debug!(user = %user.name, "user deletion declined");
        return Ok(None);
    }
    remove_user(&conn, user).map(Some)
}

fn remove_user(conn: &Connection, user: User) -> AppResult<DeleteUserResponse> {
    let entries_removed = FoodEntry::get_by_user(conn, user.id)?.len();
    let goal_removed = Goal::get_for_user(conn, user.id)?.is_some();
    let meal_plans_removed = MealPlan::get_by_user(conn, user.id)?.len();

    User::delete(conn, user.id)?;
    tracing::info!(user = %user.name, entries_removed, "deleted user");

    Ok(DeleteUserResponse {
        id: user.id,
        name: user.name,
        entries_removed,
        goal_removed,
        meal_plans_removed,
    })
}
