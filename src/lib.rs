pub mod analysis;
pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod progression;
pub mod workouts;

#[cfg(test)]
mod test_utils;

pub use config::{AppConfig, ConfigError, LogFormat};
pub use db::AppState;
pub use progression::{compute_exercise_report, compute_suggestions, validate_history};
