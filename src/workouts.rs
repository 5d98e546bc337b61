//! Workout store: the history provider behind the progression engine
//!
//! Workouts live in one SQLite table with their exercises and sets kept as a
//! JSON document, mirroring the shape the app logs them in.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::models::{ExercisePerformance, NewWorkout, WorkoutRecord};

const WORKOUT_COLUMNS: &str =
    "id, user_id, name, date, duration_minutes, notes, exercises_json, created_at";

// ---------------------------------------------------------------------------
/// Error Handling
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode workout: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid workout: {0}")]
    InvalidWorkout(String),

    #[error("Invalid history data: {0}")]
    InvalidHistory(String),

    #[error("Invalid history query: {0}")]
    InvalidQuery(String),

    #[error("Workout not found: {0}")]
    NotFound(i64),
}

impl Serialize for StoreError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ---------------------------------------------------------------------------
/// History Query: filters for the provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    /// Only workouts on or after this instant
    pub since: Option<DateTime<Utc>>,
    /// Only workouts containing an exercise with exactly this name
    pub exercise_name: Option<String>,
    /// Keep at most this many (newest first)
    pub limit: Option<i64>,
    /// Skip this many of the newest matches first
    pub offset: Option<i64>,
}

impl HistoryQuery {
    /// Workouts from the last `days` days, at most `limit`
    pub fn trailing_days(days: i64, limit: i64) -> Result<Self, StoreError> {
        Ok(Self {
            since: Some(window_start(days)?),
            limit: Some(limit),
            ..Self::default()
        })
    }

    /// Most recent workouts containing `exercise_name`, at most `limit`
    pub fn for_exercise(exercise_name: &str, limit: i64) -> Self {
        Self {
            exercise_name: Some(exercise_name.to_string()),
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// `days` before now; errors instead of overflowing the calendar
pub fn window_start(days: i64) -> Result<DateTime<Utc>, StoreError> {
    TimeDelta::try_days(days)
        .and_then(|delta| Utc::now().checked_sub_signed(delta))
        .ok_or_else(|| StoreError::InvalidQuery(format!("{} days is out of range", days)))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Fixed-width UTC timestamps so text comparison matches time order
fn encode_date(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_date(workout_id: i64, column: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StoreError::InvalidHistory(format!(
                "workout {} has unreadable {} {:?}: {}",
                workout_id, column, raw, e
            ))
        })
}

fn workout_from_row(row: &SqliteRow) -> Result<WorkoutRecord, StoreError> {
    let id: i64 = row.try_get("id")?;
    let date: String = row.try_get("date")?;
    let created_at: String = row.try_get("created_at")?;
    let exercises_json: String = row.try_get("exercises_json")?;

    let exercises: Vec<ExercisePerformance> = serde_json::from_str(&exercises_json).map_err(|e| {
        StoreError::InvalidHistory(format!("workout {} has malformed exercises: {}", id, e))
    })?;

    Ok(WorkoutRecord {
        id,
        user_id: row.try_get("user_id")?,
        date: decode_date(id, "date", &date)?,
        name: row.try_get("name")?,
        exercises,
        duration_minutes: row.try_get("duration_minutes")?,
        notes: row.try_get("notes")?,
        created_at: decode_date(id, "created_at", &created_at)?,
    })
}

fn validate_workout(workout: &NewWorkout) -> Result<(), StoreError> {
    if workout.user_id.trim().is_empty() {
        return Err(StoreError::InvalidWorkout("user_id is required".to_string()));
    }
    for exercise in &workout.exercises {
        if let Some(set) = exercise.sets.iter().find(|s| !s.has_valid_weight()) {
            return Err(StoreError::InvalidWorkout(format!(
                "{} set {} has weight {}",
                exercise.exercise_name, set.set_number, set.weight
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

/// Store a new workout and return it as it will be read back
pub async fn insert_workout(pool: &SqlitePool, workout: &NewWorkout) -> Result<WorkoutRecord, StoreError> {
    validate_workout(workout)?;

    let date = encode_date(workout.date.unwrap_or_else(Utc::now));
    let created_at = encode_date(Utc::now());
    let exercises_json = serde_json::to_string(&workout.exercises)?;

    let result = sqlx::query(
        r#"
        INSERT INTO workouts (user_id, name, date, duration_minutes, notes, exercises_json, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&workout.user_id)
    .bind(&workout.name)
    .bind(&date)
    .bind(workout.duration_minutes)
    .bind(&workout.notes)
    .bind(&exercises_json)
    .bind(&created_at)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!(workout_id = id, user_id = %workout.user_id, exercises = workout.exercises.len(), "Workout logged");

    Ok(WorkoutRecord {
        id,
        user_id: workout.user_id.clone(),
        date: decode_date(id, "date", &date)?,
        name: workout.name.clone(),
        exercises: workout.exercises.clone(),
        duration_minutes: workout.duration_minutes,
        notes: workout.notes.clone(),
        created_at: decode_date(id, "created_at", &created_at)?,
    })
}

/// Load a user's workouts, newest first, filtered by `query`
pub async fn load_workouts(
    pool: &SqlitePool,
    user_id: &str,
    query: &HistoryQuery,
) -> Result<Vec<WorkoutRecord>, StoreError> {
    let mut sql = format!("SELECT {} FROM workouts WHERE user_id = ?", WORKOUT_COLUMNS);
    let mut bind_values: Vec<String> = vec![user_id.to_string()];

    if let Some(since) = query.since {
        sql.push_str(" AND date >= ?");
        bind_values.push(encode_date(since));
    }

    if let Some(name) = &query.exercise_name {
        sql.push_str(
            " AND EXISTS (SELECT 1 FROM json_each(workouts.exercises_json) AS e \
             WHERE json_extract(e.value, '$.exercise_name') = ?)",
        );
        bind_values.push(name.clone());
    }

    sql.push_str(" ORDER BY date DESC, id DESC");
    // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded
    if query.limit.is_some() || query.offset.is_some() {
        sql.push_str(" LIMIT ?");
    }
    if query.offset.is_some() {
        sql.push_str(" OFFSET ?");
    }

    let mut sql_query = sqlx::query(&sql);
    for value in &bind_values {
        sql_query = sql_query.bind(value);
    }
    if query.limit.is_some() || query.offset.is_some() {
        sql_query = sql_query.bind(query.limit.unwrap_or(-1));
    }
    if let Some(offset) = query.offset {
        sql_query = sql_query.bind(offset);
    }

    let rows = sql_query.fetch_all(pool).await?;
    debug!(user_id, rows = rows.len(), ?query, "Loaded workout history");

    rows.iter().map(workout_from_row).collect()
}

/// Load a single workout owned by `user_id`
pub async fn get_workout(pool: &SqlitePool, user_id: &str, workout_id: i64) -> Result<WorkoutRecord, StoreError> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM workouts WHERE id = ?1 AND user_id = ?2",
        WORKOUT_COLUMNS
    ))
    .bind(workout_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound(workout_id))?;

    workout_from_row(&row)
}

/// Replace a workout owned by `user_id`. A missing `date` keeps the stored one.
pub async fn update_workout(
    pool: &SqlitePool,
    user_id: &str,
    workout_id: i64,
    workout: &NewWorkout,
) -> Result<WorkoutRecord, StoreError> {
    validate_workout(workout)?;

    let date = workout.date.map(encode_date);
    let exercises_json = serde_json::to_string(&workout.exercises)?;

    let result = sqlx::query(
        r#"
        UPDATE workouts SET
          name = ?1,
          date = COALESCE(?2, date),
          duration_minutes = ?3,
          notes = ?4,
          exercises_json = ?5
        WHERE id = ?6 AND user_id = ?7
        "#,
    )
    .bind(&workout.name)
    .bind(&date)
    .bind(workout.duration_minutes)
    .bind(&workout.notes)
    .bind(&exercises_json)
    .bind(workout_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(workout_id));
    }

    info!(workout_id, user_id, exercises = workout.exercises.len(), "Workout updated");
    get_workout(pool, user_id, workout_id).await
}

/// Delete a workout owned by `user_id`
pub async fn delete_workout(pool: &SqlitePool, user_id: &str, workout_id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = ?1 AND user_id = ?2")
        .bind(workout_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(workout_id));
    }

    info!(workout_id, user_id, "Workout deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
