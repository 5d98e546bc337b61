pub mod analysis;
pub mod progression;

use crate::db::AppState;
use crate::models::{NewWorkout, WorkoutRecord};
use crate::workouts::{self, HistoryQuery};
use tracing::warn;

/// Newest-first workouts shown in the log when no limit is given
pub const DEFAULT_WORKOUT_LIST_LIMIT: i64 = 50;

pub async fn log_workout(state: &AppState, workout: NewWorkout) -> Result<WorkoutRecord, String> {
  workouts::insert_workout(&state.db, &workout)
    .await
    .map_err(|e| format!("Failed to log workout: {}", e))
}

pub async fn get_workouts(
  state: &AppState,
  user_id: &str,
  limit: Option<i64>,
  skip: Option<i64>,
) -> Result<Vec<WorkoutRecord>, String> {
  let query = HistoryQuery {
    limit: Some(limit.unwrap_or(DEFAULT_WORKOUT_LIST_LIMIT)),
    offset: skip.filter(|&s| s > 0),
    ..HistoryQuery::default()
  };

  workouts::load_workouts(&state.db, user_id, &query)
    .await
    .map_err(|e| format!("Failed to fetch workouts: {}", e))
}

pub async fn get_workout(state: &AppState, user_id: &str, workout_id: i64) -> Result<WorkoutRecord, String> {
  workouts::get_workout(&state.db, user_id, workout_id)
    .await
    .map_err(|e| format!("Failed to fetch workout: {}", e))
}

pub async fn update_workout(
  state: &AppState,
  user_id: &str,
  workout_id: i64,
  workout: NewWorkout,
) -> Result<WorkoutRecord, String> {
  workouts::update_workout(&state.db, user_id, workout_id, &workout)
    .await
    .map_err(|e| format!("Failed to update workout: {}", e))
}

pub async fn delete_workout(state: &AppState, user_id: &str, workout_id: i64) -> Result<(), String> {
  workouts::delete_workout(&state.db, user_id, workout_id)
    .await
    .map_err(|e| {
      warn!(workout_id, user_id, error = %e, "Delete failed");
      format!("Failed to delete workout: {}", e)
    })
}
