//! Habit state engine.
//!
//! Three update rules act on a [`Snapshot`]: completion, missed-deadline
//! decay and feedback. Every rule keeps the habit weight within
//! `[floor, MAX_WEIGHT]` where the floor is [`MIN_WEIGHT`](crate::habit::MIN_WEIGHT)
//! until the habit has received feedback, and [`FEEDBACK_MIN_WEIGHT`] afterwards.
//!
//! The engine never touches the filesystem and has no clock of its own;
//! callers pass `now` explicitly.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = HabitEngine::new();
//! let mut snapshot = store.load()?;
//! engine.apply_decay(&mut snapshot, Utc::now());
//! engine.complete_habit(&mut snapshot, "diary", Utc::now())?;
//! store.save(&mut snapshot, Utc::now())?;
//! ```

mod summary;

pub use summary::{DailySummary, FeedbackReportEntry, StreakLeader};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::habit::{
    FeedbackEntry, FeedbackKind, HabitRecord, HistoryEntry, FEEDBACK_MIN_WEIGHT, MAX_WEIGHT,
};
use crate::snapshot::Snapshot;

/// Tunable parameters of the update rules.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Inactivity after which a habit decays (strictly greater than).
    pub decay_threshold: Duration,
    pub decay_step: f64,
    /// Only decay habits that currently hold a streak.
    pub decay_requires_streak: bool,
    pub completion_step: f64,
    pub positive_feedback_step: f64,
    pub negative_feedback_step: f64,
    /// Offset used to decide which calendar day `now` falls on.
    pub utc_offset: FixedOffset,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay_threshold: Duration::hours(24),
            decay_step: 0.05,
            decay_requires_streak: true,
            completion_step: 0.10,
            positive_feedback_step: 0.15,
            negative_feedback_step: 0.10,
            utc_offset: Utc.fix(),
        }
    }
}

/// Result of a successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub id: String,
    pub name: String,
    pub streak: u32,
    pub weight: f64,
    pub date: NaiveDate,
}

/// Result of a logged feedback event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    pub id: String,
    pub name: String,
    pub kind: FeedbackKind,
    pub weight: f64,
    pub positive: u32,
    pub negative: u32,
    pub score: f64,
}

/// Weights are kept at two decimals so repeated steps don't accumulate
/// float noise in the store.
pub(crate) fn round_weight(weight: f64) -> f64 {
    (weight * 100.0).round() / 100.0
}

/// Applies habit events to a snapshot.
#[derive(Debug, Clone, Default)]
pub struct HabitEngine {
    config: EngineConfig,
}

impl HabitEngine {
    /// Create an engine with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Calendar date of `now` in the configured timezone.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.config.utc_offset).date_naive()
    }

    /// Decay every habit whose reference timestamp is older than the
    /// threshold. Returns the number of habits decayed.
    ///
    /// There is no debouncing: each call recomputes from elapsed time. With
    /// `decay_requires_streak` set, a habit decays once per overdue window
    /// because its streak is already zero on the next call.
    pub fn apply_decay(&self, snapshot: &mut Snapshot, now: DateTime<Utc>) -> usize {
        let mut decayed = 0;
        for habit in snapshot.habits.values_mut() {
            if self.decay_habit(habit, now) {
                decayed += 1;
            }
        }
        if decayed > 0 {
            tracing::info!(decayed, "applied decay sweep");
        }
        decayed
    }

    fn decay_habit(&self, habit: &mut HabitRecord, now: DateTime<Utc>) -> bool {
        let Some(reference) = habit.reference_timestamp() else {
            return false;
        };
        if now - reference <= self.config.decay_threshold {
            return false;
        }
        if self.config.decay_requires_streak && habit.streak == 0 {
            return false;
        }

        let before = habit.weight;
        // Decay lowers towards the floor but never raises a weight that
        // feedback already pushed below it.
        let lowered = round_weight(habit.weight - self.config.decay_step);
        habit.weight = lowered.max(habit.weight_floor()).min(habit.weight);
        habit.streak = 0;

        tracing::debug!(
            habit = %habit.id,
            weight_before = before,
            weight_after = habit.weight,
            "habit decayed"
        );
        true
    }

    /// Record a completion for `id` at `now`.
    ///
    /// Fails with `AlreadyCompleted` without mutating anything when the habit
    /// already has a completion marker for the current calendar day.
    pub fn complete_habit(
        &self,
        snapshot: &mut Snapshot,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome> {
        let today = self.local_date(now);
        let habit = snapshot.habit_mut(id)?;

        if habit.completed_on(today, &self.config.utc_offset) {
            tracing::warn!(habit = %id, %today, "habit already completed today");
            return Err(CoreError::AlreadyCompleted {
                id: id.to_string(),
                date: today,
            });
        }

        habit.streak += 1;
        habit.weight = round_weight(habit.weight + self.config.completion_step).min(MAX_WEIGHT);
        habit.last_completed = Some(now);
        habit.history.push(HistoryEntry::completed(today));

        tracing::info!(habit = %id, streak = habit.streak, weight = habit.weight, "habit completed");

        Ok(CompletionOutcome {
            id: habit.id.clone(),
            name: habit.name.clone(),
            streak: habit.streak,
            weight: habit.weight,
            date: today,
        })
    }

    /// Apply a feedback event to `id`.
    pub fn log_feedback(
        &self,
        snapshot: &mut Snapshot,
        id: &str,
        kind: FeedbackKind,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<FeedbackOutcome> {
        let habit = snapshot.habit_mut(id)?;

        habit.weight = match kind {
            FeedbackKind::Positive => {
                round_weight(habit.weight + self.config.positive_feedback_step).min(MAX_WEIGHT)
            }
            FeedbackKind::Negative => round_weight(habit.weight - self.config.negative_feedback_step)
                .max(FEEDBACK_MIN_WEIGHT),
        };
        habit.feedback.record(FeedbackEntry::new(
            kind,
            now,
            note.filter(|n| !n.trim().is_empty()),
        ));

        tracing::info!(habit = %id, %kind, weight = habit.weight, "feedback logged");

        Ok(FeedbackOutcome {
            id: habit.id.clone(),
            name: habit.name.clone(),
            kind,
            weight: habit.weight,
            positive: habit.feedback.positive,
            negative: habit.feedback.negative,
            score: habit.feedback.score(),
        })
    }
}
