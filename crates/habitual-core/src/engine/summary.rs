//! Read-only aggregate views over a snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::HabitEngine;
use crate::habit::{FeedbackEntry, HabitRecord};
use crate::snapshot::Snapshot;

/// Feedback entries shown per habit in the feedback report.
const RECENT_FEEDBACK: usize = 3;

/// The habit with the longest current streak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakLeader {
    pub id: String,
    pub name: String,
    pub streak: u32,
}

/// Daily summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_habits: usize,
    pub daily_habits: usize,
    pub completed_today: usize,
    /// Fraction of daily habits completed today, 0.0 ..= 1.0.
    pub completion_rate: f64,
    pub average_weight: f64,
    pub streak_leader: Option<StreakLeader>,
}

impl DailySummary {
    pub fn completion_percent(&self) -> f64 {
        self.completion_rate * 100.0
    }
}

/// One row of the feedback report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReportEntry {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub positive: u32,
    pub negative: u32,
    pub net: i64,
    pub score: f64,
    /// Most recent entries, newest first.
    pub recent: Vec<FeedbackEntry>,
}

impl HabitEngine {
    /// Compute the daily summary for the day `now` falls on.
    pub fn summarize(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> DailySummary {
        let today = self.local_date(now);
        let offset = self.config().utc_offset;

        let daily: Vec<&HabitRecord> = snapshot.iter().filter(|h| h.frequency.is_daily()).collect();
        let completed_today = daily
            .iter()
            .filter(|h| h.completed_on(today, &offset))
            .count();
        let completion_rate = if daily.is_empty() {
            0.0
        } else {
            completed_today as f64 / daily.len() as f64
        };

        let average_weight = if snapshot.is_empty() {
            0.0
        } else {
            snapshot.iter().map(|h| h.weight).sum::<f64>() / snapshot.len() as f64
        };

        // Strict comparison keeps the first habit on ties.
        let mut leader: Option<&HabitRecord> = None;
        for habit in snapshot.iter() {
            if leader.map_or(true, |best| habit.streak > best.streak) {
                leader = Some(habit);
            }
        }

        DailySummary {
            date: today,
            total_habits: snapshot.len(),
            daily_habits: daily.len(),
            completed_today,
            completion_rate,
            average_weight,
            streak_leader: leader.map(|h| StreakLeader {
                id: h.id.clone(),
                name: h.name.clone(),
                streak: h.streak,
            }),
        }
    }

    /// All habits, heaviest first. Equal weights keep snapshot order.
    pub fn status_view<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a HabitRecord> {
        let mut habits: Vec<&HabitRecord> = snapshot.iter().collect();
        habits.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        habits
    }

    /// Habits that have received feedback, ranked by `positive - negative`.
    pub fn feedback_report(&self, snapshot: &Snapshot) -> Vec<FeedbackReportEntry> {
        let mut entries: Vec<FeedbackReportEntry> = snapshot
            .iter()
            .filter(|h| h.has_feedback())
            .map(|h| FeedbackReportEntry {
                id: h.id.clone(),
                name: h.name.clone(),
                weight: h.weight,
                positive: h.feedback.positive,
                negative: h.feedback.negative,
                net: h.feedback.net(),
                score: h.feedback.score(),
                recent: h.feedback.recent(RECENT_FEEDBACK),
            })
            .collect();
        entries.sort_by(|a, b| b.net.cmp(&a.net));
        entries
    }
}
