mod config;
mod store;

pub use config::{Config, DecayConfig, DisplayConfig, StoreConfig, WeightsConfig};
pub use store::SnapshotStore;

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Returns the habitual data directory.
///
/// `HABITUAL_HOME` wins when set. Otherwise `~/.config/habitual[-dev]/`,
/// with `HABITUAL_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("HABITUAL_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABITUAL_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("habitual-dev")
            } else {
                base_dir.join("habitual")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| CoreError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
