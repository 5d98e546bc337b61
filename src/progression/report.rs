//! Per-exercise history report: personal records and trend

use serde::{Deserialize, Serialize};

use super::history::ExerciseSession;
use super::{REPORT_HISTORY_LIMIT, TREND_RECENT_WINDOW, TREND_WINDOW};

/// Improvement threshold on the older average (+5%)
const IMPROVING_RATIO: f64 = 1.05;

/// Decline threshold on the older average (-5%)
const DECLINING_RATIO: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    /// One or two sessions
    NotEnoughData,
    /// No sessions at all
    NoData,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Stable => write!(f, "stable"),
            Self::Declining => write!(f, "declining"),
            Self::NotEnoughData => write!(f, "not_enough_data"),
            Self::NoData => write!(f, "no_data"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecords {
    pub max_weight: f64,
    pub max_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgressionReport {
    pub exercise_name: String,
    /// Most recent sessions first, capped at REPORT_HISTORY_LIMIT
    pub history: Vec<ExerciseSession>,
    pub personal_records: PersonalRecords,
    pub trend: Trend,
    /// All sessions seen, including those beyond the history cap
    pub total_sessions: usize,
}

fn mean_max_weight(sessions: &[ExerciseSession]) -> Option<f64> {
    if sessions.is_empty() {
        return None;
    }
    Some(sessions.iter().map(|s| s.max_weight).sum::<f64>() / sessions.len() as f64)
}

/// Compare the newest three sessions against the three before them
pub fn classify_trend(sessions: &[ExerciseSession]) -> Trend {
    if sessions.is_empty() {
        return Trend::NoData;
    }
    if sessions.len() < TREND_RECENT_WINDOW {
        return Trend::NotEnoughData;
    }

    let (recent, rest) = sessions.split_at(TREND_RECENT_WINDOW);
    let older = &rest[..rest.len().min(TREND_WINDOW - TREND_RECENT_WINDOW)];

    let recent_avg = mean_max_weight(recent).unwrap_or_default();
    // Nothing older to compare against reads as stable
    let older_avg = mean_max_weight(older).unwrap_or(recent_avg);

    if recent_avg > older_avg * IMPROVING_RATIO {
        Trend::Improving
    } else if recent_avg < older_avg * DECLINING_RATIO {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

pub fn personal_records(sessions: &[ExerciseSession]) -> PersonalRecords {
    if sessions.is_empty() {
        return PersonalRecords::default();
    }
    PersonalRecords {
        max_weight: sessions.iter().map(|s| s.max_weight).fold(f64::NEG_INFINITY, f64::max),
        max_volume: sessions.iter().map(|s| s.total_volume).fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Build the report from the exercise's full timeline (newest first)
pub fn build_report(exercise_name: &str, mut sessions: Vec<ExerciseSession>) -> ExerciseProgressionReport {
    let total_sessions = sessions.len();
    let personal_records = personal_records(&sessions);
    let trend = classify_trend(&sessions);
    sessions.truncate(REPORT_HISTORY_LIMIT);

    ExerciseProgressionReport {
        exercise_name: exercise_name.to_string(),
        history: sessions,
        personal_records,
        trend,
        total_sessions,
    }
}
