mod config;
pub mod database;
pub mod repository;

pub use config::Config;
pub use database::{Database, KvStore};
pub use repository::{
    KvSessionRepository, MemoryRepository, MemoryStore, SessionRepository, INTERVALS_KEY,
    TRACKER_STATE_KEY,
};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `PULSETRACK_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/pulsetrack[-dev]/`, where `PULSETRACK_ENV=dev` selects the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Some(dir) = std::env::var_os("PULSETRACK_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("PULSETRACK_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("pulsetrack-dev")
        } else {
            base_dir.join("pulsetrack")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
