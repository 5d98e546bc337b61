//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock workout and session factories
//! - Helper assertions

use crate::config::AppConfig;
use crate::db::AppState;
use crate::models::{ExercisePerformance, NewWorkout, SetRecord, WorkoutRecord};
use crate::progression::ExerciseSession;
use crate::workouts::insert_workout;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Command-layer state over a fresh in-memory database
pub async fn setup_test_state() -> AppState {
  AppState {
    db: setup_test_db().await,
    config: AppConfig::default(),
  }
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed one workout per day for `user_id`, starting today and going back.
/// Alternates Squat and Bench Press, each with a warmup and three working sets.
/// Returns the IDs of created workouts, newest first.
pub async fn seed_test_workouts(pool: &SqlitePool, user_id: &str, count: usize) -> Vec<i64> {
  let mut workout_ids = Vec::new();

  for i in 0..count {
    let (exercise, weight) = if i % 2 == 0 { ("Squat", 225.0) } else { ("Bench Press", 135.0) };
    let sets = vec![
      mock_warmup_set(weight * 0.5, 8),
      mock_set(weight, 5, Some(7)),
      mock_set(weight, 5, Some(7)),
      mock_set(weight, 5, Some(8)),
    ];

    let workout = mock_new_workout(user_id, i as i64, exercise, sets);
    let stored = insert_workout(pool, &workout)
      .await
      .expect("Failed to insert test workout");

    workout_ids.push(stored.id);
  }

  workout_ids
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A working set
pub fn mock_set(weight: f64, reps: u32, rpe: Option<u8>) -> SetRecord {
  SetRecord {
    set_number: 0,
    weight,
    reps,
    rpe,
    is_warmup: false,
  }
}

/// A warmup set (never counted by the engine)
pub fn mock_warmup_set(weight: f64, reps: u32) -> SetRecord {
  SetRecord {
    set_number: 0,
    weight,
    reps,
    rpe: None,
    is_warmup: true,
  }
}

/// An exercise entry with its sets numbered from 1
pub fn mock_performance(exercise_name: &str, sets: Vec<SetRecord>) -> ExercisePerformance {
  let sets = sets
    .into_iter()
    .enumerate()
    .map(|(i, set)| SetRecord { set_number: i as u32 + 1, ..set })
    .collect();

  ExercisePerformance {
    exercise_id: None,
    exercise_name: exercise_name.to_string(),
    sets,
    notes: None,
  }
}

/// A stored workout for `user_1` with a single exercise
pub fn mock_workout(id: i64, days_ago: i64, exercise_name: &str, sets: Vec<SetRecord>) -> WorkoutRecord {
  let date = datetime_days_ago(days_ago);
  WorkoutRecord {
    id,
    user_id: "user_1".to_string(),
    date,
    name: "Workout".to_string(),
    exercises: vec![mock_performance(exercise_name, sets)],
    duration_minutes: Some(60),
    notes: None,
    created_at: date,
  }
}

/// An unsaved workout with a single exercise
pub fn mock_new_workout(user_id: &str, days_ago: i64, exercise_name: &str, sets: Vec<SetRecord>) -> NewWorkout {
  NewWorkout {
    user_id: user_id.to_string(),
    date: Some(datetime_days_ago(days_ago)),
    name: "Workout".to_string(),
    exercises: vec![mock_performance(exercise_name, sets)],
    duration_minutes: Some(60),
    notes: None,
  }
}

/// Newest-first history for one exercise. Each `(weight, sets, rpe)` entry is
/// one workout of `sets` working sets of `weight` x 5 at `rpe`, one day apart.
pub fn workouts_for(exercise_name: &str, sessions: &[(f64, usize, u8)]) -> Vec<WorkoutRecord> {
  let now = Utc::now();
  let count = sessions.len() as i64;

  sessions
    .iter()
    .enumerate()
    .map(|(i, &(weight, sets, rpe))| {
      let date = now - Duration::days(i as i64);
      WorkoutRecord {
        id: count - i as i64,
        user_id: "user_1".to_string(),
        date,
        name: "Workout".to_string(),
        exercises: vec![mock_performance(
          exercise_name,
          (0..sets).map(|_| mock_set(weight, 5, Some(rpe))).collect(),
        )],
        duration_minutes: Some(60),
        notes: None,
        created_at: date,
      }
    })
    .collect()
}

/// An aggregated session of `sets` x 5 reps at `weight`
pub fn mock_session(weight: f64, sets: usize, avg_rpe: f64) -> ExerciseSession {
  ExerciseSession {
    date: Utc::now(),
    workout_id: 1,
    max_weight: weight,
    sets_completed: sets,
    total_reps: sets as u32 * 5,
    total_volume: weight * sets as f64 * 5.0,
    avg_rpe,
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr) => {
    $crate::assert_approx_eq!($left, $right, 1e-9)
  };
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'workouts'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_workouts_returns_correct_count() {
    let pool = setup_test_db().await;

    let ids = seed_test_workouts(&pool, "user_1", 5).await;
    assert_eq!(ids.len(), 5);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = 'user_1'")
      .fetch_one(&pool)
      .await
      .expect("Failed to count workouts");

    assert_eq!(count, 5);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_workouts_for_is_newest_first() {
    let history = workouts_for("Squat", &[(225.0, 3, 8), (220.0, 3, 7)]);

    assert_eq!(history.len(), 2);
    assert!(history[0].date > history[1].date);
    assert!(history[0].id > history[1].id);
    assert_eq!(history[0].exercises[0].sets.len(), 3);
    assert_eq!(history[1].exercises[0].sets[2].set_number, 3);
  }

  #[test]
  fn test_mock_session_totals() {
    let session = mock_session(100.0, 3, 7.5);
    assert_eq!(session.total_reps, 15);
    assert_approx_eq!(session.total_volume, 1500.0);
  }
}
