//! JSON file persistence for snapshots.
//!
//! Every operation is a full load followed by a full save. There is no
//! locking: two processes doing read-modify-write on the same file race,
//! and the last save wins.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{CoreError, Result};
use crate::snapshot::Snapshot;

/// Loads and saves a [`Snapshot`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured path.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn io_error(&self, source: std::io::Error) -> CoreError {
        CoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the snapshot.
    ///
    /// # Errors
    ///
    /// `Io` if the file is missing or unreadable, `Parse` if it is not a
    /// valid snapshot.
    pub fn load(&self) -> Result<Snapshot> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let mut snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|source| CoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        snapshot.fill_missing_ids();
        tracing::debug!(path = %self.path.display(), habits = snapshot.len(), "snapshot loaded");
        Ok(snapshot)
    }

    /// Stamp `meta.lastUpdated` and write the whole snapshot.
    ///
    /// The file is written next to the target and renamed over it, so a
    /// failed save leaves the previous contents in place.
    pub fn save(&self, snapshot: &mut Snapshot, now: DateTime<Utc>) -> Result<()> {
        snapshot.meta.last_updated = Some(now);

        let mut content = serde_json::to_string_pretty(snapshot)?;
        content.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::info!(path = %self.path.display(), habits = snapshot.len(), "snapshot saved");
        Ok(())
    }

    /// Create an empty store if none exists. Returns `true` if one was created.
    pub fn init(&self, now: DateTime<Utc>) -> Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.save(&mut Snapshot::new(), now)?;
        Ok(true)
    }
}
