//! The persisted collection of habits.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::habit::HabitRecord;

/// Snapshot metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    /// Set by the store on every save.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// All habit records keyed by id, plus metadata.
///
/// Iteration follows insertion (file) order, which is also the tie-break
/// order for aggregate views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub habits: IndexMap<String, HabitRecord>,
    #[serde(default)]
    pub meta: SnapshotMeta,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HabitRecord> {
        self.habits.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HabitRecord> {
        self.habits.values()
    }

    /// Mutable lookup, failing with `NotFound`.
    pub fn habit_mut(&mut self, id: &str) -> Result<&mut HabitRecord> {
        self.habits
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })
    }

    /// Add a new habit. Ids are immutable, so an existing id is rejected.
    pub fn insert_habit(&mut self, habit: HabitRecord) -> Result<()> {
        if habit.id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("habit id must not be empty".into()));
        }
        if self.habits.contains_key(&habit.id) {
            return Err(CoreError::DuplicateHabit { id: habit.id });
        }
        self.habits.insert(habit.id.clone(), habit);
        Ok(())
    }

    /// Remove a habit, keeping the order of the remaining ones.
    pub fn remove_habit(&mut self, id: &str) -> Result<HabitRecord> {
        self.habits
            .shift_remove(id)
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })
    }

    /// Fill in record ids that files omit, using the map key. The filled id
    /// lives in memory only and is not added to the file on save.
    pub(crate) fn fill_missing_ids(&mut self) {
        for (key, habit) in self.habits.iter_mut() {
            if habit.id.is_empty() {
                habit.id = key.clone();
            }
        }
    }
}
