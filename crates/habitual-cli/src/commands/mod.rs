pub mod complete;
pub mod config;
pub mod feedback;
pub mod habit;
pub mod status;

use chrono::{DateTime, Utc};
use habitual_core::{
    Config, CoreError, HabitEngine, ReportRenderer, Snapshot, SnapshotStore,
};

use crate::GlobalArgs;

/// Everything a store-backed command needs, resolved from config and flags.
pub struct Context {
    pub store: SnapshotStore,
    pub engine: HabitEngine,
    pub renderer: ReportRenderer,
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn new(globals: &GlobalArgs) -> Result<Self, CoreError> {
        let config = Config::load()?;
        let store = match &globals.store {
            Some(path) => SnapshotStore::new(path),
            None => SnapshotStore::from_config(&config)?,
        };
        let format = globals.format.unwrap_or_else(|| config.report_format());
        tracing::debug!(store = %store.path().display(), %format, "resolved command context");

        Ok(Self {
            store,
            engine: HabitEngine::with_config(config.engine_config()),
            renderer: ReportRenderer::new(format).with_offset(config.utc_offset()),
            now: Utc::now(),
        })
    }

    pub fn load(&self) -> Result<Snapshot, CoreError> {
        self.store.load()
    }

    pub fn save(&self, snapshot: &mut Snapshot) -> Result<(), CoreError> {
        self.store.save(snapshot, self.now)
    }
}
