//! Habit records and their feedback log.
//!
//! The on-disk shape uses camelCase keys (`lastCompleted`, `feedback.history`)
//! so existing habit files load unchanged. Fields this crate does not know
//! about are carried in `extra` and written back as they were read.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound for every habit weight.
pub const MAX_WEIGHT: f64 = 3.0;
/// Floor applied by completion and decay.
pub const MIN_WEIGHT: f64 = 1.0;
/// Floor once a habit has received any feedback.
pub const FEEDBACK_MIN_WEIGHT: f64 = 0.5;
/// Weight assigned to newly created habits.
pub const DEFAULT_WEIGHT: f64 = 1.0;
/// Number of feedback entries kept per habit.
pub const FEEDBACK_HISTORY_LIMIT: usize = 20;
/// Action recorded in history markers written by the engine.
pub const ACTION_COMPLETED: &str = "completed";

/// How often a habit is expected to be performed.
///
/// Only `Daily` participates in completion-rate statistics. Unrecognized
/// cadences are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Other(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Other(s) => s,
        }
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, Frequency::Daily)
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Other(value),
        }
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for Frequency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Frequency::from(s.trim().to_lowercase()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A history marker in record form, `{date, action}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    pub action: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A completion marker in a habit's history.
///
/// Older files store bare dates; newer ones store `{date, action}` records.
/// Both shapes are kept as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Record(HistoryRecord),
    Date(NaiveDate),
}

impl HistoryEntry {
    pub fn completed(date: NaiveDate) -> Self {
        HistoryEntry::Record(HistoryRecord {
            date,
            action: ACTION_COMPLETED.to_string(),
            extra: serde_json::Map::new(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            HistoryEntry::Record(record) => record.date,
            HistoryEntry::Date(date) => *date,
        }
    }

    pub fn is_completion(&self) -> bool {
        match self {
            HistoryEntry::Record(record) => record.action == ACTION_COMPLETED,
            HistoryEntry::Date(_) => true,
        }
    }
}

/// Polarity of a feedback event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Negative,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Positive => "positive",
            FeedbackKind::Negative => "negative",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One feedback event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeedbackEntry {
    pub fn new(kind: FeedbackKind, timestamp: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            kind,
            timestamp,
            note,
            extra: serde_json::Map::new(),
        }
    }
}

/// Feedback counters plus a bounded history of recent events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLog {
    #[serde(default)]
    pub positive: u32,
    #[serde(default)]
    pub negative: u32,
    #[serde(default)]
    pub history: Vec<FeedbackEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeedbackLog {
    pub fn is_empty(&self) -> bool {
        self.positive == 0 && self.negative == 0 && self.history.is_empty() && self.extra.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative
    }

    /// `positive - negative`, used to rank habits in feedback reports.
    pub fn net(&self) -> i64 {
        i64::from(self.positive) - i64::from(self.negative)
    }

    /// Feedback score in `[-1.0, 1.0]`; 0 when no feedback was recorded.
    pub fn score(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.net() as f64 / f64::from(total)
    }

    /// Count the event and append it, dropping the oldest entries beyond
    /// [`FEEDBACK_HISTORY_LIMIT`].
    pub fn record(&mut self, entry: FeedbackEntry) {
        match entry.kind {
            FeedbackKind::Positive => self.positive += 1,
            FeedbackKind::Negative => self.negative += 1,
        }
        self.history.push(entry);
        if self.history.len() > FEEDBACK_HISTORY_LIMIT {
            let excess = self.history.len() - FEEDBACK_HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// Up to `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<FeedbackEntry> {
        self.history.iter().rev().take(n).cloned().collect()
    }
}

/// Which optional keys a record carried when it was read.
///
/// A key the file omitted is only written back once it holds a
/// non-default value, so loading and saving an untouched record leaves it
/// as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StoredKeys {
    id: bool,
    name: bool,
    description: bool,
    frequency: bool,
    weight: bool,
    streak: bool,
    last_completed: bool,
    history: bool,
    feedback: bool,
}

impl StoredKeys {
    /// Shape of a freshly created record. Feedback stays out of the file
    /// until the first event.
    fn created() -> Self {
        Self {
            id: true,
            name: true,
            description: true,
            frequency: true,
            weight: true,
            streak: true,
            last_completed: true,
            history: true,
            feedback: false,
        }
    }
}

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredHabit", into = "StoredHabit")]
pub struct HabitRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub frequency: Frequency,
    pub weight: f64,
    pub streak: u32,
    pub last_completed: Option<DateTime<Utc>>,
    /// Alternate reference timestamp carried by imported records.
    pub last_logged: Option<DateTime<Utc>>,
    pub history: Vec<HistoryEntry>,
    pub feedback: FeedbackLog,
    pub extra: serde_json::Map<String, serde_json::Value>,
    stored: StoredKeys,
}

/// On-disk form of [`HabitRecord`]. `None` means the key is absent.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredHabit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency: Option<Frequency>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_weight"
    )]
    weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    streak: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    last_completed: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_logged: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    history: Option<Vec<HistoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feedback: Option<FeedbackLog>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Whole-number weights are written as integers (`1`, not `1.0`).
fn serialize_weight<S>(weight: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match weight {
        Some(w) if w.fract() == 0.0 && w.abs() < 1e15 => {
            serializer.serialize_i64(*w as i64)
        }
        Some(w) => serializer.serialize_f64(*w),
        None => serializer.serialize_none(),
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`).
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<StoredHabit> for HabitRecord {
    fn from(raw: StoredHabit) -> Self {
        let stored = StoredKeys {
            id: raw.id.is_some(),
            name: raw.name.is_some(),
            description: raw.description.is_some(),
            frequency: raw.frequency.is_some(),
            weight: raw.weight.is_some(),
            streak: raw.streak.is_some(),
            last_completed: raw.last_completed.is_some(),
            history: raw.history.is_some(),
            feedback: raw.feedback.is_some(),
        };
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            frequency: raw.frequency.unwrap_or_default(),
            weight: raw.weight.unwrap_or(DEFAULT_WEIGHT),
            streak: raw.streak.unwrap_or_default(),
            last_completed: raw.last_completed.flatten(),
            last_logged: raw.last_logged,
            history: raw.history.unwrap_or_default(),
            feedback: raw.feedback.unwrap_or_default(),
            extra: raw.extra,
            stored,
        }
    }
}

impl From<HabitRecord> for StoredHabit {
    fn from(habit: HabitRecord) -> Self {
        let keys = habit.stored;
        Self {
            id: keys.id.then_some(habit.id),
            name: (keys.name || !habit.name.is_empty()).then_some(habit.name),
            description: (keys.description || !habit.description.is_empty())
                .then_some(habit.description),
            frequency: (keys.frequency || !habit.frequency.is_daily()).then_some(habit.frequency),
            weight: (keys.weight || habit.weight != DEFAULT_WEIGHT).then_some(habit.weight),
            streak: (keys.streak || habit.streak != 0).then_some(habit.streak),
            last_completed: (keys.last_completed || habit.last_completed.is_some())
                .then_some(habit.last_completed),
            last_logged: habit.last_logged,
            history: (keys.history || !habit.history.is_empty()).then_some(habit.history),
            feedback: (keys.feedback || !habit.feedback.is_empty()).then_some(habit.feedback),
            extra: habit.extra,
        }
    }
}

impl HabitRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            frequency: Frequency::Daily,
            weight: DEFAULT_WEIGHT,
            streak: 0,
            last_completed: None,
            last_logged: None,
            history: Vec::new(),
            feedback: FeedbackLog::default(),
            extra: serde_json::Map::new(),
            stored: StoredKeys::created(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Timestamp decay is measured from.
    pub fn reference_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_completed.or(self.last_logged)
    }

    pub fn has_feedback(&self) -> bool {
        self.feedback.total() > 0
    }

    /// Lowest weight decay may leave this habit at.
    pub fn weight_floor(&self) -> f64 {
        if self.has_feedback() {
            FEEDBACK_MIN_WEIGHT
        } else {
            MIN_WEIGHT
        }
    }

    /// Whether a completion marker exists for `date` in the given timezone.
    pub fn completed_on(&self, date: NaiveDate, offset: &FixedOffset) -> bool {
        let by_timestamp = self
            .last_completed
            .map(|ts| ts.with_timezone(offset).date_naive() == date)
            .unwrap_or(false);
        by_timestamp
            || self
                .history
                .iter()
                .any(|entry| entry.is_completion() && entry.date() == date)
    }
}
