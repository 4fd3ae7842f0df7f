//! # habitual Core Library
//!
//! This library provides the core logic for habitual, a habit tracker for
//! AI agents. All operations are available through the standalone `habitual`
//! CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Habit State Engine**: pure update rules for completion, decay and
//!   feedback, plus read-only summary views
//! - **Storage**: JSON snapshot store and TOML-based configuration
//! - **Reports**: text, markdown and JSON rendering
//!
//! ## Key Components
//!
//! - [`HabitEngine`]: Applies events to a snapshot
//! - [`Snapshot`]: All habit records keyed by id
//! - [`SnapshotStore`]: Full load / full save persistence
//! - [`Config`]: Application configuration management
//! - [`ReportRenderer`]: Renders views in a [`ReportFormat`]

pub mod engine;
pub mod error;
pub mod habit;
pub mod report;
pub mod snapshot;
pub mod storage;

pub use engine::{
    CompletionOutcome, DailySummary, EngineConfig, FeedbackOutcome, FeedbackReportEntry,
    HabitEngine, StreakLeader,
};
pub use error::{ConfigError, CoreError};
pub use habit::{
    FeedbackEntry, FeedbackKind, FeedbackLog, Frequency, HabitRecord, HistoryEntry, HistoryRecord,
};
pub use report::{ReportFormat, ReportRenderer};
pub use snapshot::{Snapshot, SnapshotMeta};
pub use storage::{Config, SnapshotStore};
