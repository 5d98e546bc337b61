pub mod workout;

pub use workout::{ExercisePerformance, NewWorkout, SetRecord, WorkoutRecord};
