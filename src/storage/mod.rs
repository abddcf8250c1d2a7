//! Storage layer for ynab-splitwise-sync
//!
//! Persists the sync state: the watermark, the per-day response cache and the
//! submission ledger. Each piece sits behind a trait with a file-backed and an
//! in-memory implementation.

pub mod cache;
pub mod file_io;
pub mod ledger;
pub mod watermark;

pub use cache::{CacheStore, FileCacheStore, InMemoryCacheStore, QueryKey, ResponseCache};
pub use file_io::{read_json, write_text_atomic};
pub use ledger::{FileLedger, InMemoryLedger, LedgerEntry, SubmissionLedger};
pub use watermark::{FileWatermarkStore, InMemoryWatermarkStore, WatermarkStore};

use crate::config::paths::SyncPaths;
use crate::error::SyncError;

/// File-backed sync state rooted at the configured directory
pub struct Storage {
    paths: SyncPaths,
    pub watermark: FileWatermarkStore,
    pub ledger: FileLedger,
}

impl Storage {
    /// Open the state directory, creating it if needed
    pub fn new(paths: SyncPaths) -> Result<Self, SyncError> {
        paths.ensure_directories()?;

        Ok(Self {
            watermark: FileWatermarkStore::new(paths.watermark_file()),
            ledger: FileLedger::open(paths.ledger_file())?,
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SyncPaths {
        &self.paths
    }

    /// A response cache over the cache directory
    pub fn response_cache(&self) -> ResponseCache<FileCacheStore> {
        ResponseCache::new(FileCacheStore::new(self.paths.cache_dir()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SyncPaths::with_base_dir(temp_dir.path().join("state"));
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("state").exists());
        assert_eq!(storage.watermark.read(), None);
        assert!(storage.ledger.is_empty());
        // cache directory is created on demand
        assert!(!storage.paths().cache_dir().exists());
    }
}
