use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged set. Only sets with `is_warmup == false` count as working sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
  #[serde(default)]
  pub set_number: u32,
  pub weight: f64,
  pub reps: u32,
  /// Rate of perceived exertion, conventionally 1-10
  #[serde(default)]
  pub rpe: Option<u8>,
  #[serde(default)]
  pub is_warmup: bool,
}

impl SetRecord {
  pub fn is_working(&self) -> bool {
    !self.is_warmup
  }

  pub fn volume(&self) -> f64 {
    self.weight * self.reps as f64
  }

  /// Weights must be finite and non-negative
  pub fn has_valid_weight(&self) -> bool {
    self.weight.is_finite() && self.weight >= 0.0
  }
}

/// One exercise inside a workout. `exercise_name` is the grouping key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePerformance {
  #[serde(default)]
  pub exercise_id: Option<String>,
  pub exercise_name: String,
  #[serde(default)]
  pub sets: Vec<SetRecord>,
  #[serde(default)]
  pub notes: Option<String>,
}

impl ExercisePerformance {
  pub fn working_sets(&self) -> impl Iterator<Item = &SetRecord> {
    self.sets.iter().filter(|s| s.is_working())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
  pub id: i64,
  pub user_id: String,
  pub date: DateTime<Utc>,
  pub name: String,
  pub exercises: Vec<ExercisePerformance>,
  pub duration_minutes: Option<i64>,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// For inserting new workouts (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
  pub user_id: String,
  /// Defaults to now when absent
  #[serde(default)]
  pub date: Option<DateTime<Utc>>,
  #[serde(default = "default_workout_name")]
  pub name: String,
  #[serde(default)]
  pub exercises: Vec<ExercisePerformance>,
  #[serde(default)]
  pub duration_minutes: Option<i64>,
  #[serde(default)]
  pub notes: Option<String>,
}

fn default_workout_name() -> String {
  "Workout".to_string()
}
