//! strength-log CLI
//!
//! Commands:
//! - log: store a workout read from a JSON file
//! - workouts: list a user's most recent workouts
//! - update: replace a stored workout from a JSON file
//! - suggest: ranked progression suggestions
//! - report: history, records and trend for one exercise
//! - warmup: warm-up ramp for a working weight
//! - volume: per-workout volume over a trailing window

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;

use strength_log_lib::commands::{self, analysis, progression};
use strength_log_lib::models::NewWorkout;
use strength_log_lib::{logging, AppConfig, AppState};

/// Strength training log with adaptive progression suggestions
#[derive(Parser)]
#[command(name = "strength-log")]
#[command(version)]
#[command(about = "Log strength workouts and get load progression suggestions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a workout from a JSON file (use - for stdin)
    Log {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// List recent workouts, newest first
    Workouts {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        limit: Option<i64>,

        /// Skip this many of the newest workouts
        #[arg(short, long)]
        skip: Option<i64>,
    },

    /// Replace a stored workout with the contents of a JSON file (use - for stdin)
    Update {
        #[arg(short, long)]
        user: String,

        /// Workout id
        id: i64,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// Ranked progression suggestions over the lookback window
    Suggest {
        #[arg(short, long)]
        user: String,
    },

    /// Progression report for a single exercise
    Report {
        #[arg(short, long)]
        user: String,

        /// Exercise name, matched exactly
        exercise: String,
    },

    /// Warm-up sets for a working weight
    Warmup {
        weight: f64,

        #[arg(short, long, default_value = "Exercise")]
        exercise: String,
    },

    /// Volume per workout over the last N days
    Volume {
        #[arg(short, long)]
        user: String,

        #[arg(short, long, default_value = "30")]
        days: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config);

    match run(cli, config).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<String, String> {
    // Warm-up needs no database
    if let Commands::Warmup { weight, exercise } = &cli.command {
        return to_json(&analysis::calculate_warmup_sets(*weight, exercise)?);
    }

    let state = AppState::connect(config)
        .await
        .map_err(|e| format!("Failed to initialize database: {}", e))?;

    let output = execute(&state, cli.command).await;
    state.db.close().await;
    output
}

async fn execute(state: &AppState, command: Commands) -> Result<String, String> {
    match command {
        Commands::Log { user, file } => {
            let mut workout = read_workout(&file)?;
            workout.user_id = user;
            to_json(&commands::log_workout(state, workout).await?)
        }
        Commands::Workouts { user, limit, skip } => {
            to_json(&commands::get_workouts(state, &user, limit, skip).await?)
        }
        Commands::Update { user, id, file } => {
            let mut workout = read_workout(&file)?;
            workout.user_id = user.clone();
            to_json(&commands::update_workout(state, &user, id, workout).await?)
        }
        Commands::Suggest { user } => to_json(&progression::get_progression_suggestions(state, &user).await?),
        Commands::Report { user, exercise } => {
            to_json(&progression::get_exercise_progression(state, &user, &exercise).await?)
        }
        Commands::Warmup { weight, exercise } => to_json(&analysis::calculate_warmup_sets(weight, &exercise)?),
        Commands::Volume { user, days } => to_json(&analysis::get_workout_volume(state, &user, days).await?),
    }
}

/// Workout JSON; `user_id` may be omitted since the CLI flag sets it
fn read_workout(path: &Path) -> Result<NewWorkout, String> {
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).map_err(|e| format!("Failed to read stdin: {}", e))?
    } else {
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?
    };

    let mut value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| format!("Failed to parse workout: {}", e))?;
    if let Some(obj) = value.as_object_mut() {
        obj.entry("user_id").or_insert_with(|| serde_json::Value::String(String::new()));
    }

    serde_json::from_value(value).map_err(|e| format!("Failed to parse workout: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to encode output: {}", e))
}
