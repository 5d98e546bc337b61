//! History aggregation: raw workouts -> per-exercise session timelines

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{round_to, DEFAULT_RPE};
use crate::models::{ExercisePerformance, WorkoutRecord};

/// Working-set summary of one exercise in one workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub date: DateTime<Utc>,
    pub workout_id: i64,
    pub max_weight: f64,
    pub sets_completed: usize,
    pub total_reps: u32,
    /// Sum of weight x reps over working sets
    pub total_volume: f64,
    /// Mean RPE of the working sets that report one, one decimal
    pub avg_rpe: f64,
}

impl ExerciseSession {
    /// Summarize the working sets of `performance`. None when every set is a warmup.
    pub fn from_performance(workout: &WorkoutRecord, performance: &ExercisePerformance) -> Option<Self> {
        let working: Vec<_> = performance.working_sets().collect();
        if working.is_empty() {
            return None;
        }

        let max_weight = working
            .iter()
            .map(|s| s.weight)
            .fold(f64::NEG_INFINITY, f64::max);
        let total_reps: u32 = working.iter().map(|s| s.reps).sum();
        let total_volume: f64 = working.iter().map(|s| s.volume()).sum();

        // An RPE of 0 is treated as unreported
        let rated: Vec<f64> = working
            .iter()
            .filter_map(|s| s.rpe)
            .filter(|&rpe| rpe > 0)
            .map(f64::from)
            .collect();
        let avg_rpe = if rated.is_empty() {
            DEFAULT_RPE
        } else {
            round_to(rated.iter().sum::<f64>() / rated.len() as f64, 1)
        };

        Some(Self {
            date: workout.date,
            workout_id: workout.id,
            max_weight,
            sets_completed: working.len(),
            total_reps,
            total_volume,
            avg_rpe,
        })
    }
}

/// All sessions of one exercise, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseHistory {
    pub exercise_name: String,
    pub sessions: Vec<ExerciseSession>,
}

/// Exercise timelines in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedHistory {
    exercises: Vec<ExerciseHistory>,
}

impl GroupedHistory {
    pub fn iter(&self) -> impl Iterator<Item = &ExerciseHistory> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Group every named exercise's working-set sessions, keeping the input's
/// newest-first order within each exercise.
pub fn aggregate_history(workouts: &[WorkoutRecord]) -> GroupedHistory {
    let (exercises, _) = workouts
        .iter()
        .flat_map(|workout| workout.exercises.iter().map(move |p| (workout, p)))
        .filter(|(_, performance)| !performance.exercise_name.is_empty())
        .filter_map(|(workout, performance)| {
            ExerciseSession::from_performance(workout, performance)
                .map(|session| (performance.exercise_name.as_str(), session))
        })
        .fold(
            (Vec::<ExerciseHistory>::new(), HashMap::<&str, usize>::new()),
            |(mut exercises, mut index), (name, session)| {
                match index.get(name) {
                    Some(&i) => exercises[i].sessions.push(session),
                    None => {
                        index.insert(name, exercises.len());
                        exercises.push(ExerciseHistory {
                            exercise_name: name.to_string(),
                            sessions: vec![session],
                        });
                    }
                }
                (exercises, index)
            },
        );

    GroupedHistory { exercises }
}

/// Sessions for a single exercise (exact name match), newest first
pub fn sessions_for_exercise(exercise_name: &str, workouts: &[WorkoutRecord]) -> Vec<ExerciseSession> {
    workouts
        .iter()
        .flat_map(|workout| {
            workout
                .exercises
                .iter()
                .filter(|p| p.exercise_name == exercise_name)
                .filter_map(move |p| ExerciseSession::from_performance(workout, p))
        })
        .collect()
}
