//! Deterministic workout utilities
//!
//! Small calculations the app shows next to the log: warm-up ramps for a
//! working weight and the per-workout volume series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::WorkoutRecord;

/// ---------------------------------------------------------------------------
/// Warm-up Calculator
/// ---------------------------------------------------------------------------

/// (fraction of working weight, reps) for each ramp step
const WARMUP_RAMP: [(f64, u32); 3] = [(0.4, 10), (0.6, 6), (0.8, 3)];

/// Warm-up weights snap to the nearest multiple of this
const WARMUP_ROUNDING: f64 = 5.0;

/// Ramp steps lighter than this are dropped (empty bar territory)
const WARMUP_MIN_WEIGHT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupSet {
  pub set_number: u32,
  pub weight: f64,
  pub reps: u32,
  /// Percentage of the working weight
  pub percentage: u32,
  pub is_warmup: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupPlan {
  pub exercise_name: String,
  pub working_weight: f64,
  pub warmup_sets: Vec<WarmupSet>,
}

impl WarmupPlan {
  /// Build the ramp for `working_weight`. Non-positive weights get no ramp.
  pub fn compute(exercise_name: &str, working_weight: f64) -> Self {
    let warmup_sets = if working_weight > 0.0 {
      WARMUP_RAMP
        .iter()
        .enumerate()
        .filter_map(|(i, &(pct, reps))| {
          let weight = (working_weight * pct / WARMUP_ROUNDING).round_ties_even() * WARMUP_ROUNDING;
          (weight >= WARMUP_MIN_WEIGHT).then(|| WarmupSet {
            set_number: i as u32 + 1,
            weight,
            reps,
            percentage: (pct * 100.0).round() as u32,
            is_warmup: true,
          })
        })
        .collect()
    } else {
      Vec::new()
    };

    Self {
      exercise_name: exercise_name.to_string(),
      working_weight,
      warmup_sets,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout Volume
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutVolume {
  pub workout_id: i64,
  pub date: DateTime<Utc>,
  pub workout_name: String,
  /// Sum of weight x reps over every working set in the workout
  pub volume: f64,
}

impl WorkoutVolume {
  pub fn compute(workout: &WorkoutRecord) -> Self {
    let volume: f64 = workout
      .exercises
      .iter()
      .flat_map(|e| e.working_sets())
      .map(|s| s.volume())
      .sum();

    Self {
      workout_id: workout.id,
      date: workout.date,
      workout_name: workout.name.clone(),
      volume,
    }
  }
}

/// Volume per workout, oldest first (chart order)
pub fn volume_series(workouts: &[WorkoutRecord]) -> Vec<WorkoutVolume> {
  let mut series: Vec<WorkoutVolume> = workouts.iter().map(WorkoutVolume::compute).collect();
  series.sort_by_key(|v| v.date);
  series
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{mock_performance, mock_set, mock_warmup_set, mock_workout};

  #[test]
  fn test_warmup_ramp_for_225() {
    let plan = WarmupPlan::compute("Squat", 225.0);

    // 90, 135, 180
    let weights: Vec<_> = plan.warmup_sets.iter().map(|s| s.weight).collect();
    assert_eq!(weights, vec![90.0, 135.0, 180.0]);

    let reps: Vec<_> = plan.warmup_sets.iter().map(|s| s.reps).collect();
    assert_eq!(reps, vec![10, 6, 3]);

    let pcts: Vec<_> = plan.warmup_sets.iter().map(|s| s.percentage).collect();
    assert_eq!(pcts, vec![40, 60, 80]);

    assert!(plan.warmup_sets.iter().all(|s| s.is_warmup));
    assert_eq!(plan.working_weight, 225.0);
  }

  #[test]
  fn test_warmup_drops_light_steps() {
    // 15 -> 6 rounds to 5 (dropped), 9 -> 10, 12 -> 10
    let plan = WarmupPlan::compute("Curl", 15.0);
    let numbered: Vec<_> = plan.warmup_sets.iter().map(|s| (s.set_number, s.weight)).collect();
    assert_eq!(numbered, vec![(2, 10.0), (3, 10.0)]);
  }

  #[test]
  fn test_warmup_for_non_positive_weight() {
    assert!(WarmupPlan::compute("Squat", 0.0).warmup_sets.is_empty());
    assert!(WarmupPlan::compute("Squat", -45.0).warmup_sets.is_empty());
  }

  #[test]
  fn test_workout_volume_ignores_warmups() {
    let mut workout = mock_workout(
      1,
      0,
      "Bench Press",
      vec![mock_warmup_set(95.0, 10), mock_set(135.0, 5, Some(7)), mock_set(135.0, 5, Some(8))],
    );
    workout.exercises.push(mock_performance("Row", vec![mock_set(100.0, 10, None)]));

    let volume = WorkoutVolume::compute(&workout);
    assert_eq!(volume.volume, 135.0 * 5.0 * 2.0 + 1000.0);
    assert_eq!(volume.workout_id, 1);
  }

  #[test]
  fn test_volume_series_oldest_first() {
    let newest = mock_workout(2, 0, "Squat", vec![mock_set(200.0, 5, None)]);
    let oldest = mock_workout(1, 3, "Squat", vec![mock_set(180.0, 5, None)]);

    let series = volume_series(&[newest, oldest]);
    let ids: Vec<_> = series.iter().map(|v| v.workout_id).collect();
    assert_eq!(ids, vec![1, 2]);
  }
}
