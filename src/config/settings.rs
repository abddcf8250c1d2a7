//! User settings for ynab-splitwise-sync
//!
//! Manages the sync rules (which category group and memo marker qualify a
//! transaction), the destination group, and the watermark policy.

use serde::{Deserialize, Serialize};

use super::paths::SyncPaths;
use crate::error::SyncError;

/// How the watermark moves when some submissions failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPolicy {
    /// Hold the watermark at the earliest failed transaction's date so the
    /// failed items are fetched again on the next run
    #[default]
    AtLeastOnce,
    /// Always advance to today, even if some submissions failed
    BestEffort,
}

/// User settings for the sync job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Splitwise group that receives the expenses
    #[serde(default)]
    pub splitwise_group_id: Option<u64>,

    /// YNAB category group whose categories are shared
    #[serde(default = "default_shared_group_name")]
    pub shared_category_group_name: String,

    /// Memo substring (case-insensitive) that marks a transaction as shared
    #[serde(default = "default_memo_marker")]
    pub memo_marker: String,

    /// Source minor units per major currency unit (YNAB uses milliunits)
    #[serde(default = "default_minor_unit_scale")]
    pub minor_unit_scale: i64,

    /// Watermark behaviour on partial failure
    #[serde(default)]
    pub watermark_policy: WatermarkPolicy,

    /// Whether source API responses are cached per day
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_shared_group_name() -> String {
    "Shared".to_string()
}

fn default_memo_marker() -> String {
    "splitwise".to_string()
}

fn default_minor_unit_scale() -> i64 {
    1000
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            splitwise_group_id: None,
            shared_category_group_name: default_shared_group_name(),
            memo_marker: default_memo_marker(),
            minor_unit_scale: default_minor_unit_scale(),
            watermark_policy: WatermarkPolicy::default(),
            cache_enabled: default_cache_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use the defaults if the file doesn't exist
    pub fn load_or_create(paths: &SyncPaths) -> Result<Self, SyncError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SyncError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SyncError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject settings the sync cannot run with
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.minor_unit_scale <= 0 {
            return Err(SyncError::Config(format!(
                "minor_unit_scale must be positive, got {}",
                self.minor_unit_scale
            )));
        }
        if self.memo_marker.trim().is_empty() {
            return Err(SyncError::Config("memo_marker must not be empty".into()));
        }
        Ok(())
    }
}
