//! Commands for the adaptive progression engine

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::db::AppState;
use crate::progression::{
    compute_exercise_report, compute_suggestions, validate_history, ExerciseProgressionReport,
    ProgressionSuggestion, REPORT_FETCH_LIMIT,
};
use crate::workouts::{load_workouts, HistoryQuery};

#[derive(Debug, Clone, Serialize)]
pub struct ProgressionSuggestionsResponse {
    pub suggestions: Vec<ProgressionSuggestion>,
    /// Exercises with enough sessions to be analyzed
    pub total_exercises_analyzed: usize,
    pub generated_at: DateTime<Utc>,
}

/// Ranked suggestions over the configured lookback window
pub async fn get_progression_suggestions(
    state: &AppState,
    user_id: &str,
) -> Result<ProgressionSuggestionsResponse, String> {
    let query = HistoryQuery::trailing_days(state.config.lookback_days, state.config.max_workouts)
        .map_err(|e| format!("Failed to load workout history: {}", e))?;
    let history = load_workouts(&state.db, user_id, &query)
        .await
        .map_err(|e| format!("Failed to load workout history: {}", e))?;

    validate_history(&history).map_err(|e| format!("Failed to compute suggestions: {}", e))?;

    let set = compute_suggestions(&history);
    info!(
        user_id,
        workouts = history.len(),
        suggestions = set.suggestions.len(),
        analyzed = set.eligible_exercise_count,
        "Progression suggestions computed"
    );

    Ok(ProgressionSuggestionsResponse {
        suggestions: set.suggestions,
        total_exercises_analyzed: set.eligible_exercise_count,
        generated_at: Utc::now(),
    })
}

/// History, records and trend for one exercise
pub async fn get_exercise_progression(
    state: &AppState,
    user_id: &str,
    exercise_name: &str,
) -> Result<ExerciseProgressionReport, String> {
    let query = HistoryQuery::for_exercise(exercise_name, REPORT_FETCH_LIMIT);
    let history = load_workouts(&state.db, user_id, &query)
        .await
        .map_err(|e| format!("Failed to load workout history: {}", e))?;

    validate_history(&history).map_err(|e| format!("Failed to build report: {}", e))?;

    let report = compute_exercise_report(exercise_name, &history);
    info!(
        user_id,
        exercise = exercise_name,
        sessions = report.total_sessions,
        trend = %report.trend,
        "Exercise report built"
    );

    Ok(report)
}
