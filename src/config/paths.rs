//! Path management for ynab-splitwise-sync
//!
//! Provides XDG-compliant path resolution for configuration and sync state.
//!
//! ## Path Resolution Order
//!
//! 1. `YNAB_SPLITWISE_SYNC_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/ynab-splitwise-sync` or `~/.config/ynab-splitwise-sync`
//! 3. Windows: `%APPDATA%\ynab-splitwise-sync`

use std::path::PathBuf;

use crate::error::SyncError;

/// Environment variable that overrides the base directory
pub const DIR_ENV_VAR: &str = "YNAB_SPLITWISE_SYNC_DIR";

/// Manages all paths used by the sync job
#[derive(Debug, Clone)]
pub struct SyncPaths {
    /// Base directory for all sync state
    base_dir: PathBuf,
}

impl SyncPaths {
    /// Create a new SyncPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if neither the override nor a home/config directory
    /// can be determined.
    pub fn new() -> Result<Self, SyncError> {
        let base_dir = if let Ok(custom) = std::env::var(DIR_ENV_VAR) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create SyncPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the watermark file
    pub fn watermark_file(&self) -> PathBuf {
        self.base_dir.join("last-sync-date.txt")
    }

    /// Get the path to the category mapping file
    pub fn category_map_file(&self) -> PathBuf {
        self.base_dir.join("category-map.json")
    }

    /// Get the path to the submission ledger
    pub fn ledger_file(&self) -> PathBuf {
        self.base_dir.join("ledger.jsonl")
    }

    /// Get the response cache directory (created on first write)
    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("cache")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), SyncError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SyncError::Io(format!("Failed to create base directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default state directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, SyncError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| SyncError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("ynab-splitwise-sync"))
}

/// Resolve the default state directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, SyncError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| SyncError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("ynab-splitwise-sync"))
}
