//! health-cli
//!
//! Command-line nutrition tracker.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use health_cli::build_info::BuildInfo;
use health_cli::config::Config;
use health_cli::db::{self, Database};
use health_cli::models::{FoodEntryUpdate, MealSlot};
use health_cli::render;
use health_cli::tools::{dashboard, entries, goals, meal_plans, reports, users};
use health_cli::validation::parse_date;
use health_cli::{AppError, AppResult};

#[derive(Debug, Parser)]
#[command(name = "health-cli", about = "Track food, calorie goals and meal plans", version)]
struct Cli {
    /// SQLite database file (overrides HEALTH_CLI_DATABASE_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new user
    UserCreate { name: String },

    /// List users
    UserList,

    /// Delete a user and everything they logged
    UserDelete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Add a food entry
    EntryAdd {
        #[arg(long)]
        user: String,
        #[arg(long)]
        food: String,
        #[arg(long, allow_negative_numbers = true)]
        calories: i64,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// List food entries
    EntryList {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of a food entry
    EntryUpdate {
        entry_id: i64,
        #[arg(long)]
        food: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        calories: Option<i64>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a food entry
    EntryDelete {
        entry_id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Set daily and weekly calorie goals
    GoalSet {
        #[arg(long)]
        user: String,
        #[arg(long, allow_negative_numbers = true)]
        daily: i64,
        #[arg(long, allow_negative_numbers = true)]
        weekly: i64,
    },

    /// Show a user's goals
    GoalList {
        #[arg(long)]
        user: String,
    },

    /// Daily report
    Report {
        #[arg(long)]
        user: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Seven-day calorie summary
    WeeklyReport {
        #[arg(long)]
        user: String,
        /// First day of the week, YYYY-MM-DD
        #[arg(long)]
        start: String,
    },

    /// Create (if needed) and show a meal plan
    MealPlan {
        user_name: String,
        week_start: String,
        /// Plan length in days
        #[arg(long)]
        days: Option<u64>,
    },

    /// Fill one meal slot of a plan
    MealSet {
        user_name: String,
        week_start: String,
        date: String,
        /// breakfast, lunch or dinner
        slot: String,
        description: String,
    },

    /// Today's progress and entries
    Dashboard { username: String },
}

fn init_tracing(config: &Config, verbose: u8) {
    let default_directive = match verbose {
        0 => "health_cli=warn",
        1 => "health_cli=info",
        _ => "health_cli=debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| match config.log_filter {
            Some(ref f) if verbose == 0 => EnvFilter::try_new(f),
            _ => EnvFilter::try_new(default_directive),
        })
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_database(config: &Config) -> AppResult<Database> {
    config.ensure_data_dir()?;
    let database = Database::new(&config.database_path, config.pool_size)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!(version, path = %config.database_path.display(), "database ready");
        Ok(())
    })?;

    Ok(database)
}

/// Ask for y/N on stdin; the prompt goes to stderr so stdout stays parseable
fn confirm(prompt: &str) -> AppResult<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> AppResult<String> {
    if json {
        let mut out = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(text(value))
    }
}

/// Output for a declined confirmation
fn aborted(json: bool) -> AppResult<String> {
    emit(json, &serde_json::json!({ "status": "aborted" }), |_| "Aborted.\n".to_string())
}

fn parse_optional_date(value: Option<String>) -> AppResult<Option<chrono::NaiveDate>> {
    value.as_deref().map(parse_date).transpose()
}

fn run(db: &Database, command: Command, json: bool) -> AppResult<String> {
    match command {
        Command::UserCreate { name } => {
            let user = users::create_user(db, &name)?;
            emit(json, &user, render::user_created)
        }
        Command::UserList => emit(json, &users::list_users(db)?, |u| render::user_list(u)),
        Command::UserDelete { name, force } => {
            let deleted = users::delete_user_confirmed(db, &name, |user| {
                if force {
                    return Ok(true);
                }
                confirm(&format!("Delete user {} and all of their data?", user.name))
            })?;
            match deleted {
                Some(resp) => emit(json, &resp, render::user_deleted),
                None => aborted(json),
            }
        }
        Command::EntryAdd { user, food, calories, date } => {
            let date = parse_optional_date(date)?;
            let added = entries::add_entry(db, &user, &food, calories, date)?;
            emit(json, &added, render::entry_added)
        }
        Command::EntryList { user, date } => {
            let date = parse_optional_date(date)?;
            let rows = entries::list_entries(db, user.as_deref(), date)?;
            emit(json, &rows, |r| render::entry_list(r))
        }
        Command::EntryUpdate { entry_id, food, calories, date } => {
            let patch = FoodEntryUpdate {
                food,
                calories,
                date: parse_optional_date(date)?,
            };
            emit(json, &entries::update_entry(db, entry_id, patch)?, render::entry_updated)
        }
        Command::EntryDelete { entry_id, force } => {
            let entry = entries::get_entry(db, entry_id)?;
            let prompt = format!(
                "Delete entry {}: {} ({} cal) on {}?",
                entry.id, entry.food, entry.calories, entry.date
            );
            if !force && !confirm(&prompt)? {
                return aborted(json);
            }
            emit(json, &entries::delete_entry(db, entry_id)?, render::entry_deleted)
        }
        Command::GoalSet { user, daily, weekly } => {
            let goal = goals::set_goal(db, &user, daily, weekly)?;
            emit(json, &goal, |g| render::goal_set(user.trim(), g))
        }
        Command::GoalList { user } => emit(json, &goals::list_goal(db, &user)?, render::goal_view),
        Command::Report { user, date } => {
            let date = parse_optional_date(date)?.unwrap_or_else(entries::today);
            emit(json, &reports::daily_report(db, &user, date)?, render::daily_report)
        }
        Command::WeeklyReport { user, start } => {
            let start = parse_date(&start)?;
            emit(json, &reports::weekly_summary(db, &user, start)?, render::weekly_summary)
        }
        Command::MealPlan { user_name, week_start, days } => {
            let week_start = parse_date(&week_start)?;
            let view = meal_plans::meal_plan(db, &user_name, week_start, days)?;
            emit(json, &view, render::meal_plan)
        }
        Command::MealSet { user_name, week_start, date, slot, description } => {
            let week_start = parse_date(&week_start)?;
            let date = parse_date(&date)?;
            let slot = MealSlot::parse(&slot).ok_or_else(|| {
                AppError::Validation(format!(
                    "unknown meal slot '{}' (expected breakfast, lunch or dinner)",
                    slot
                ))
            })?;
            let view = meal_plans::set_meal(db, &user_name, week_start, date, slot, &description)?;
            emit(json, &view, render::meal_plan)
        }
        Command::Dashboard { username } => {
            let dash = dashboard::dashboard(db, &username, entries::today())?;
            emit(json, &dash, render::dashboard)
        }
    }
}

fn main() -> ExitCode {
    let matches = Cli::command()
        .long_version(BuildInfo::current().long_version())
        .get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let config = match Config::from_env() {
        Ok(config) => config.with_database_override(cli.database.clone()),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config, cli.verbose);

    let result = open_database(&config).and_then(|db| run(&db, cli.command, cli.json));

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
