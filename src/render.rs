//! Plain-text rendering
//!
//! Turns tool responses into aligned tables for the terminal.

use std::fmt::Write;

use crate::models::{FoodEntry, Goal, User};
use crate::tools::dashboard::Dashboard;
use crate::tools::entries::{AddEntryResponse, EntryRow};
use crate::tools::goals::{GoalView, Target};
use crate::tools::meal_plans::MealPlanView;
use crate::tools::reports::{DailyReport, WeeklySummary};
use crate::tools::users::{DeleteUserResponse, UserSummary};

/// Column-aligned text table
#[derive(Debug, Default)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    right_align: Vec<bool>,
    rows: Vec<Vec<String>>,
    footer: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add a column; numeric columns are right-aligned
    pub fn column(mut self, header: &str, numeric: bool) -> Self {
        self.headers.push(header.to_string());
        self.right_align.push(numeric);
        self
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Rows printed below a separator, e.g. totals
    pub fn footer<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.footer.push(cells.into_iter().map(Into::into).collect());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in self.rows.iter().chain(self.footer.iter()) {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }

    fn write_row(&self, out: &mut String, cells: &[String], widths: &[usize]) {
        let line: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if self.right_align.get(i).copied().unwrap_or(false) {
                    format!("{:>width$}", cell, width = *w)
                } else {
                    format!("{:<width$}", cell, width = *w)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));
        let mut out = String::new();

        if let Some(ref title) = self.title {
            let _ = writeln!(out, "{}", title);
        }
        self.write_row(&mut out, &self.headers, &widths);
        let _ = writeln!(out, "{}", rule);
        for row in &self.rows {
            self.write_row(&mut out, row, &widths);
        }
        if !self.footer.is_empty() {
            let _ = writeln!(out, "{}", rule);
            for row in &self.footer {
                self.write_row(&mut out, row, &widths);
            }
        }
        out
    }
}

pub fn user_created(user: &User) -> String {
    format!("Created user: {} (id {})\n", user.name, user.id)
}

pub fn user_list(users: &[UserSummary]) -> String {
    if users.is_empty() {
        return "No users registered.\n".to_string();
    }

    let mut table = Table::new("Users")
        .column("ID", true)
        .column("Name", false)
        .column("Entries", true)
        .column("Goal", false);
    for u in users {
        table.row([
            u.id.to_string(),
            u.name.clone(),
            u.entry_count.to_string(),
            (if u.has_goal { "yes" } else { "no" }).to_string(),
        ]);
    }
    table.render()
}

pub fn user_deleted(resp: &DeleteUserResponse) -> String {
    format!(
        "Deleted user {} ({} entries, {} meal plans{})\n",
        resp.name,
        resp.entries_removed,
        resp.meal_plans_removed,
        if resp.goal_removed { ", goal" } else { "" }
    )
}

pub fn entry_added(resp: &AddEntryResponse) -> String {
    format!(
        "Added {} ({} cal) for {} on {} [entry {}]\n",
        resp.food, resp.calories, resp.user, resp.date, resp.id
    )
}

pub fn entry_list(rows: &[EntryRow]) -> String {
    if rows.is_empty() {
        return "No entries found.\n".to_string();
    }

    let mut table = Table::new("Food Entries")
        .column("ID", true)
        .column("Date", false)
        .column("User", false)
        .column("Food", false)
        .column("Calories", true);
    for r in rows {
        table.row([
            r.id.to_string(),
            r.date.to_string(),
            r.user.clone(),
            r.food.clone(),
            r.calories.to_string(),
        ]);
    }
    let total = rows.iter().fold(0i64, |acc, r| acc.saturating_add(r.calories));
    table.footer(["", "", "", "TOTAL", total.to_string().as_str()]);
    table.render()
}

pub fn entry_updated(entry: &FoodEntry) -> String {
    format!(
        "Updated entry {}: {} ({} cal) on {}\n",
        entry.id, entry.food, entry.calories, entry.date
    )
}

pub fn entry_deleted(entry: &FoodEntry) -> String {
    format!("Deleted entry {}: {} ({} cal)\n", entry.id, entry.food, entry.calories)
}

pub fn goal_set(user: &str, goal: &Goal) -> String {
    format!(
        "Set goals for {}: {} daily, {} weekly\n",
        user, goal.daily_calories, goal.weekly_calories
    )
}

pub fn goal_view(view: &GoalView) -> String {
    match &view.goal {
        Some(goal) => {
            let mut table = Table::new(format!("Goals for {}", view.user))
                .column("Target", false)
                .column("Calories", true);
            table.row(["Daily".to_string(), goal.daily_calories.to_string()]);
            table.row(["Weekly".to_string(), goal.weekly_calories.to_string()]);
            table.render()
        }
        None => format!("No goals set for {}.\n", view.user),
    }
}

pub fn daily_report(report: &DailyReport) -> String {
    let mut table = Table::new(format!("Nutrition Report - {} - {}", report.user, report.date))
        .column("Food", false)
        .column("Calories", true);
    for entry in &report.entries {
        table.row([entry.food.clone(), entry.calories.to_string()]);
    }
    table.footer(["TOTAL".to_string(), report.total_calories.to_string()]);
    if let Some(goal) = report.goal {
        table.footer(["GOAL".to_string(), goal.to_string()]);
    }

    let mut out = table.render();
    if let (Some(status), Some(percent)) = (report.status, report.percent_of_goal) {
        let _ = writeln!(out, "Status: {} ({}% of daily goal)", status, percent);
    }
    out
}

pub fn weekly_summary(summary: &WeeklySummary) -> String {
    let mut table = Table::new(format!(
        "Weekly Summary - {} - {} to {}",
        summary.user, summary.week_start, summary.week_end
    ))
    .column("Day", false)
    .column("Date", false)
    .column("Calories", true);
    for (date, total) in &summary.daily_totals {
        table.row([date.format("%A").to_string(), date.to_string(), total.to_string()]);
    }
    table.footer(["TOTAL".to_string(), String::new(), summary.weekly_total.to_string()]);
    if let Some(goal) = summary.weekly_goal {
        table.footer(["GOAL".to_string(), String::new(), goal.to_string()]);
    }
    table.render()
}

pub fn meal_plan(view: &MealPlanView) -> String {
    let mut out = String::new();
    if view.created {
        let _ = writeln!(out, "Created meal plan for {}.", view.user);
    }

    let mut table = Table::new(format!("Meal Plan {} to {}", view.start_date, view.end_date))
        .column("Day", false)
        .column("Breakfast", false)
        .column("Lunch", false)
        .column("Dinner", false);
    for r in &view.rows {
        table.row([r.weekday.clone(), r.breakfast.clone(), r.lunch.clone(), r.dinner.clone()]);
    }
    out.push_str(&table.render());
    let _ = writeln!(out, "Snack suggestion: about {} cal", view.snack_calories);
    out
}

fn progress_line(label: &str, consumed: i64, target: Option<Target>) -> String {
    match target {
        Some(t) => match t.over_by(consumed) {
            Some(over) => format!("{}: {} / {} cal, over by {}", label, consumed, t.target, over),
            None => format!("{}: {} / {} cal, {} remaining", label, consumed, t.target, t.remaining),
        },
        None => format!("{}: {} cal (no goal set)", label, consumed),
    }
}

pub fn dashboard(dash: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard for {} - {}", dash.user, dash.date);
    let _ = writeln!(out, "{}", progress_line("Today", dash.today_total, dash.daily));
    let _ = writeln!(
        out,
        "{}",
        progress_line(&format!("Week since {}", dash.week_start), dash.week_total, dash.weekly)
    );
    let _ = writeln!(out, "Snack suggestion: about {} cal", dash.snack_calories);
    let _ = writeln!(out);

    if dash.entries.is_empty() {
        out.push_str("No entries today.\n");
    } else {
        let mut table = Table::new("Today's Entries")
            .column("ID", true)
            .column("Food", false)
            .column("Calories", true);
        for e in &dash.entries {
            table.row([e.id.to_string(), e.food.clone(), e.calories.to_string()]);
        }
        out.push_str(&table.render());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::reports::GoalStatus;
    use chrono::NaiveDate;

    fn entry(id: i64, food: &str, calories: i64) -> FoodEntry {
        FoodEntry {
            id,
            user_id: 1,
            food: food.into(),
            calories,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_table_aligns_columns() {
        let mut table = Table::new("T").column("Food", false).column("Cal", true);
        table.row(["eggs", "300"]);
        table.row(["toast", "50"]);

        let out = table.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "T");
        assert_eq!(lines[1], "Food   Cal");
        assert_eq!(lines[2], "----------");
        assert_eq!(lines[3], "eggs   300");
        assert_eq!(lines[4], "toast   50");
    }

    #[test]
    fn test_daily_report_shows_status() {
        let report = DailyReport {
            user: "alice".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            total_calories: 450,
            entries: vec![entry(1, "eggs", 300), entry(2, "toast", 150)],
            goal: Some(2000),
            status: Some(GoalStatus::Under),
            percent_of_goal: Some(22),
        };

        let out = daily_report(&report);
        assert!(out.contains("TOTAL"));
        assert!(out.contains("450"));
        assert!(out.contains("Status: Under (22% of daily goal)"));
    }

    #[test]
    fn test_daily_report_without_goal_omits_status() {
        let report = DailyReport {
            user: "alice".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            total_calories: 300,
            entries: vec![entry(1, "eggs", 300)],
            goal: None,
            status: None,
            percent_of_goal: None,
        };

        let out = daily_report(&report);
        assert!(!out.contains("GOAL"));
        assert!(!out.contains("Status"));
    }

    #[test]
    fn test_progress_line() {
        let t = Target::evaluate(2000, 2300);
        assert_eq!(progress_line("Today", 2300, Some(t)), "Today: 2300 / 2000 cal, over by 300");
        assert_eq!(progress_line("Today", 10, None), "Today: 10 cal (no goal set)");
    }
}
