//! Suggestion engine: ordered rule table over the recent session window

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::history::{ExerciseSession, GroupedHistory};
use super::{round_to, LOAD_INCREMENT, MIN_SESSIONS_FOR_ANALYSIS, SUGGESTION_WINDOW};

// ---------------------------------------------------------------------------
/// Confidence: How sure the engine is about a decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Sort key: high first
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

// ---------------------------------------------------------------------------
/// Session Window: the aggregates every rule reads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SessionWindow<'a> {
    /// Most recent sessions, newest first (at most SUGGESTION_WINDOW)
    pub sessions: &'a [ExerciseSession],
    pub current_weight: f64,
    pub avg_sets: f64,
    pub avg_rpe: f64,
}

impl<'a> SessionWindow<'a> {
    /// Window over the newest SUGGESTION_WINDOW sessions. None for an empty timeline.
    pub fn new(sessions: &'a [ExerciseSession]) -> Option<Self> {
        let recent = &sessions[..sessions.len().min(SUGGESTION_WINDOW)];
        let current = recent.first()?;
        let n = recent.len() as f64;

        Some(Self {
            sessions: recent,
            current_weight: current.max_weight,
            avg_sets: recent.iter().map(|s| s.sets_completed as f64).sum::<f64>() / n,
            avg_rpe: recent.iter().map(|s| s.avg_rpe).sum::<f64>() / n,
        })
    }

    /// Every session in the window hit the same top weight
    pub fn weights_constant(&self) -> bool {
        self.sessions
            .windows(2)
            .all(|pair| pair[0].max_weight == pair[1].max_weight)
    }

    pub fn is_full(&self) -> bool {
        self.sessions.len() >= SUGGESTION_WINDOW
    }
}

// ---------------------------------------------------------------------------
/// Rule Table: evaluated top to bottom, first match wins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Add load by this nominal percentage
    Progress { increase_pct: f64 },
    /// Stay at the current load
    Hold,
}

pub struct ProgressionRule {
    pub name: &'static str,
    pub applies: fn(&SessionWindow<'_>) -> bool,
    pub action: RuleAction,
    pub confidence: Confidence,
    pub reason: fn(&SessionWindow<'_>) -> String,
}

impl std::fmt::Debug for ProgressionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionRule")
            .field("name", &self.name)
            .field("action", &self.action)
            .field("confidence", &self.confidence)
            .finish()
    }
}

pub const PROGRESSION_RULES: &[ProgressionRule] = &[
    ProgressionRule {
        name: "excellent",
        applies: is_excellent,
        action: RuleAction::Progress { increase_pct: 5.0 },
        confidence: Confidence::High,
        reason: excellent_reason,
    },
    ProgressionRule {
        name: "good",
        applies: is_good,
        action: RuleAction::Progress { increase_pct: 2.5 },
        confidence: Confidence::Medium,
        reason: good_reason,
    },
    ProgressionRule {
        name: "high_fatigue",
        applies: is_fatigued,
        action: RuleAction::Hold,
        confidence: Confidence::High,
        reason: fatigue_reason,
    },
    ProgressionRule {
        name: "stagnant",
        applies: is_stagnant,
        action: RuleAction::Progress { increase_pct: 2.5 },
        confidence: Confidence::Low,
        reason: stagnant_reason,
    },
];

fn is_excellent(w: &SessionWindow<'_>) -> bool {
    w.avg_sets >= 3.0 && w.avg_rpe <= 7.0
}

fn is_good(w: &SessionWindow<'_>) -> bool {
    w.avg_sets >= 3.0 && w.avg_rpe <= 8.0
}

fn is_fatigued(w: &SessionWindow<'_>) -> bool {
    w.avg_rpe >= 9.0
}

fn is_stagnant(w: &SessionWindow<'_>) -> bool {
    w.is_full() && w.weights_constant()
}

fn excellent_reason(w: &SessionWindow<'_>) -> String {
    format!(
        "Excellent! Completed avg {:.1} sets at RPE {:.1}. Ready for progression.",
        w.avg_sets, w.avg_rpe
    )
}

fn good_reason(w: &SessionWindow<'_>) -> String {
    format!(
        "Good progress! Completed avg {:.1} sets at RPE {:.1}. Small increase recommended.",
        w.avg_sets, w.avg_rpe
    )
}

fn fatigue_reason(w: &SessionWindow<'_>) -> String {
    format!(
        "RPE is high ({:.1}). Focus on current weight before progressing.",
        w.avg_rpe
    )
}

fn stagnant_reason(_: &SessionWindow<'_>) -> String {
    "Weight has been constant. Try a small increase to test limits.".to_string()
}

// ---------------------------------------------------------------------------
/// Decisions and Suggestions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionDecision {
    pub rule: &'static str,
    pub should_progress: bool,
    pub confidence: Confidence,
    /// Nominal increase; 0 when holding
    pub increase_pct: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSuggestion {
    pub exercise_name: String,
    pub current_weight: f64,
    pub suggested_weight: f64,
    pub increase_amount: f64,
    /// Recomputed from the rounded increase, not the nominal percentage
    pub increase_percentage: f64,
    pub confidence: Confidence,
    pub reason: String,
    pub recent_performance: Vec<ExerciseSession>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionSet {
    /// Ranked high -> medium -> low
    pub suggestions: Vec<ProgressionSuggestion>,
    /// Exercises with enough sessions to analyze, suggestion or not
    pub eligible_exercise_count: usize,
}

/// Round `current_weight * increase_pct%` to the nearest plate increment
/// (ties to even), never below one increment.
pub fn compute_increase(current_weight: f64, increase_pct: f64) -> f64 {
    let steps = (current_weight * (increase_pct / 100.0) / LOAD_INCREMENT).round_ties_even();
    (steps * LOAD_INCREMENT).max(LOAD_INCREMENT)
}

// ---------------------------------------------------------------------------
/// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct SuggestionEngine<'r> {
    rules: &'r [ProgressionRule],
}

impl Default for SuggestionEngine<'static> {
    fn default() -> Self {
        Self { rules: PROGRESSION_RULES }
    }
}

impl<'r> SuggestionEngine<'r> {
    pub fn with_rules(rules: &'r [ProgressionRule]) -> Self {
        Self { rules }
    }

    /// First matching rule for the window, or None when nothing applies
    pub fn evaluate(&self, window: &SessionWindow<'_>) -> Option<ProgressionDecision> {
        let rule = self.rules.iter().find(|rule| (rule.applies)(window))?;

        let (should_progress, increase_pct) = match rule.action {
            RuleAction::Progress { increase_pct } => (true, increase_pct),
            RuleAction::Hold => (false, 0.0),
        };

        Some(ProgressionDecision {
            rule: rule.name,
            should_progress,
            confidence: rule.confidence,
            increase_pct,
            reason: (rule.reason)(window),
        })
    }

    /// Suggestion for a single exercise timeline (newest first)
    pub fn suggest_exercise(
        &self,
        exercise_name: &str,
        sessions: &[ExerciseSession],
    ) -> Option<ProgressionSuggestion> {
        if sessions.len() < MIN_SESSIONS_FOR_ANALYSIS {
            return None;
        }

        let window = SessionWindow::new(sessions)?;
        if window.current_weight <= 0.0 {
            return None;
        }

        let decision = self.evaluate(&window)?;
        debug!(
            exercise = exercise_name,
            rule = decision.rule,
            confidence = %decision.confidence,
            avg_sets = window.avg_sets,
            avg_rpe = window.avg_rpe,
            "Progression rule matched"
        );

        if !decision.should_progress || decision.increase_pct <= 0.0 {
            return None;
        }

        let increase_amount = compute_increase(window.current_weight, decision.increase_pct);

        Some(ProgressionSuggestion {
            exercise_name: exercise_name.to_string(),
            current_weight: window.current_weight,
            suggested_weight: window.current_weight + increase_amount,
            increase_amount,
            increase_percentage: round_to(increase_amount / window.current_weight * 100.0, 1),
            confidence: decision.confidence,
            reason: decision.reason,
            recent_performance: window.sessions.to_vec(),
        })
    }

    /// Ranked suggestions across every exercise in `grouped`
    pub fn suggest(&self, grouped: &GroupedHistory) -> SuggestionSet {
        let eligible_exercise_count = grouped
            .iter()
            .filter(|e| e.sessions.len() >= MIN_SESSIONS_FOR_ANALYSIS)
            .count();

        let mut suggestions: Vec<ProgressionSuggestion> = grouped
            .iter()
            .filter_map(|e| self.suggest_exercise(&e.exercise_name, &e.sessions))
            .collect();

        // Stable: ties keep exercise order
        suggestions.sort_by_key(|s| s.confidence.rank());

        SuggestionSet {
            suggestions,
            eligible_exercise_count,
        }
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
