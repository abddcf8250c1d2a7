//! Watermark persistence
//!
//! The watermark is the date of the last completed sync. It is read once at
//! the start of a run and written at most once at the end.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::warn;

use super::file_io::{read_text, write_text_atomic};
use crate::error::{SyncError, SyncResult};

/// On-disk date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persists the last-sync date
pub trait WatermarkStore {
    /// Last committed watermark, `None` when there is none or it can't be read
    fn read(&self) -> Option<NaiveDate>;

    /// Replace the stored watermark
    fn commit(&self, date: NaiveDate) -> SyncResult<()>;
}

/// Plain-text watermark file holding a single `YYYY-MM-DD` date
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl WatermarkStore for FileWatermarkStore {
    fn read(&self) -> Option<NaiveDate> {
        let contents = match read_text(&self.path) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "watermark unreadable, syncing from the beginning");
                return None;
            }
        };

        match NaiveDate::parse_from_str(contents.trim(), DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "watermark unparseable, syncing from the beginning");
                None
            }
        }
    }

    fn commit(&self, date: NaiveDate) -> SyncResult<()> {
        write_text_atomic(&self.path, &date.format(DATE_FORMAT).to_string()).map_err(|e| {
            SyncError::Storage(format!(
                "Failed to commit watermark to {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Watermark held in memory (for tests and dry experiments)
#[derive(Debug, Default)]
pub struct InMemoryWatermarkStore {
    value: Mutex<Option<NaiveDate>>,
    offline: bool,
}

impl InMemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(date: NaiveDate) -> Self {
        Self {
            value: Mutex::new(Some(date)),
            offline: false,
        }
    }

    /// Make every commit fail
    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }
}

impl WatermarkStore for InMemoryWatermarkStore {
    fn read(&self) -> Option<NaiveDate> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn commit(&self, date: NaiveDate) -> SyncResult<()> {
        if self.offline {
            return Err(SyncError::Storage("Watermark store offline".into()));
        }
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(date);
        Ok(())
    }
}
