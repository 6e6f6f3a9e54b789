//! Data models
//!
//! Rust structs representing database entities.

mod food_entry;
mod goal;
mod meal_plan;
mod user;

pub use food_entry::{total_calories, FoodEntry, FoodEntryCreate, FoodEntryUpdate};
pub use goal::{Goal, GoalSet, GoalUpdate};
pub use meal_plan::{DayMeals, MealPlan, MealPlanCreate, MealPlanUpdate, MealSlot};
pub use user::{User, UserCreate, UserUpdate};
