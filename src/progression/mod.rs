//! Adaptive Progression Engine
//!
//! Turns a user's recent workout history into explainable load suggestions:
//! - history: working-set sessions grouped per exercise (newest first)
//! - suggestions: ordered rule table deciding who is ready to add weight
//! - report: personal records and trend for a single exercise
//!
//! Key principles:
//! - Warmup sets never feed an aggregate
//! - Pure and synchronous: callers fetch and validate history, then compute
//! - Windows are named policy constants, not slicing literals

pub mod history;
pub mod report;
pub mod suggestions;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::WorkoutRecord;

pub use history::{aggregate_history, ExerciseHistory, ExerciseSession, GroupedHistory};
pub use report::{ExerciseProgressionReport, PersonalRecords, Trend};
pub use suggestions::{
    Confidence, ProgressionDecision, ProgressionRule, ProgressionSuggestion, RuleAction,
    SessionWindow, SuggestionEngine, SuggestionSet, PROGRESSION_RULES,
};

// ---------------------------------------------------------------------------
/// Window Policy
// ---------------------------------------------------------------------------

/// Sessions an exercise needs before it is analyzed at all
pub const MIN_SESSIONS_FOR_ANALYSIS: usize = 2;

/// Most recent sessions the suggestion rules look at
pub const SUGGESTION_WINDOW: usize = 3;

/// Most recent sessions averaged as the "recent" side of the trend
pub const TREND_RECENT_WINDOW: usize = 3;

/// Total sessions the trend compares (recent + older)
pub const TREND_WINDOW: usize = 6;

/// Sessions returned in a report's history
pub const REPORT_HISTORY_LIMIT: usize = 20;

/// Trailing window fetched for suggestions
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Upper bound on workouts fetched for suggestions
pub const DEFAULT_MAX_WORKOUTS: i64 = 50;

/// Upper bound on workouts fetched for a single-exercise report
pub const REPORT_FETCH_LIMIT: i64 = 100;

/// RPE assumed for a session where no working set reports one
pub const DEFAULT_RPE: f64 = 7.0;

/// Smallest practical load change (plate pair)
pub const LOAD_INCREMENT: f64 = 2.5;

// ---------------------------------------------------------------------------
/// Error Handling
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HistoryError {
    #[error("Invalid history data: {0}")]
    InvalidHistory(String),
}

impl Serialize for HistoryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Check the provider's output before it reaches the engine.
///
/// The engine assumes newest-first ordering and non-negative finite weights;
/// anything else is a broken provider and fails the request.
pub fn validate_history(history: &[WorkoutRecord]) -> Result<(), HistoryError> {
    let mut previous: Option<DateTime<Utc>> = None;

    for workout in history {
        if let Some(prev) = previous {
            if workout.date > prev {
                return Err(HistoryError::InvalidHistory(format!(
                    "workout {} ({}) is newer than the workout before it; history must be newest-first",
                    workout.id,
                    workout.date.to_rfc3339()
                )));
            }
        }
        previous = Some(workout.date);

        for exercise in &workout.exercises {
            for set in &exercise.sets {
                if !set.has_valid_weight() {
                    return Err(HistoryError::InvalidHistory(format!(
                        "workout {}: {} set {} has weight {}",
                        workout.id, exercise.exercise_name, set.set_number, set.weight
                    )));
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
/// Entry Points
// ---------------------------------------------------------------------------

/// Rank progression suggestions for every exercise in `history` (newest first)
pub fn compute_suggestions(history: &[WorkoutRecord]) -> SuggestionSet {
    let grouped = aggregate_history(history);
    debug!(
        workouts = history.len(),
        exercises = grouped.len(),
        "Computing progression suggestions"
    );
    SuggestionEngine::default().suggest(&grouped)
}

/// Build the history report for one exercise from `history` (newest first)
pub fn compute_exercise_report(exercise_name: &str, history: &[WorkoutRecord]) -> ExerciseProgressionReport {
    let sessions = history::sessions_for_exercise(exercise_name, history);
    debug!(exercise = exercise_name, sessions = sessions.len(), "Building exercise report");
    report::build_report(exercise_name, sessions)
}

/// Round to `decimals` places, ties to even
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
