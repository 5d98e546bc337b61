use crate::analysis::{volume_series, WarmupPlan, WorkoutVolume};
use crate::db::AppState;
use crate::workouts::{load_workouts, window_start, HistoryQuery};

/// Upper bound on workouts charted by the volume series
pub const VOLUME_FETCH_LIMIT: i64 = 100;

/// ---------------------------------------------------------------------------
/// Warm-up Commands
/// ---------------------------------------------------------------------------

pub fn calculate_warmup_sets(working_weight: f64, exercise_name: &str) -> Result<WarmupPlan, String> {
  if !working_weight.is_finite() {
    return Err(format!("Failed to calculate warmup: invalid weight {}", working_weight));
  }
  Ok(WarmupPlan::compute(exercise_name, working_weight))
}

/// ---------------------------------------------------------------------------
/// Volume Commands
/// ---------------------------------------------------------------------------

/// Volume per workout over the trailing `days`, oldest first
pub async fn get_workout_volume(
  state: &AppState,
  user_id: &str,
  days: i64,
) -> Result<Vec<WorkoutVolume>, String> {
  if days <= 0 {
    return Err(format!("Failed to fetch volume: days must be positive, got {}", days));
  }

  let since = window_start(days).map_err(|e| format!("Failed to fetch volume: {}", e))?;
  let query = HistoryQuery {
    since: Some(since),
    limit: Some(VOLUME_FETCH_LIMIT),
    ..HistoryQuery::default()
  };

  let workouts = load_workouts(&state.db, user_id, &query)
    .await
    .map_err(|e| format!("Failed to fetch volume: {}", e))?;

  Ok(volume_series(&workouts))
}
