//! Submission ledger
//!
//! Append-only record of source transactions that already produced an
//! expense. The watermark has day granularity and the source's since-date
//! filter is inclusive, so consecutive windows overlap; the ledger is what
//! keeps an overlapping or retried transaction from being submitted twice.
//!
//! The file format is line-delimited JSON (one entry per line). Entries whose
//! transaction date falls before the committed watermark can never be fetched
//! again, so `compact` drops them to keep the file bounded.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::file_io::{read_text, write_text_atomic};
use crate::error::{SyncError, SyncResult};
use crate::models::{Money, TransactionId};

/// One submitted expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub transaction_id: TransactionId,
    /// Date of the source transaction
    pub transaction_date: NaiveDate,
    /// Destination expense id, when the service returned one
    pub expense_id: Option<u64>,
    pub amount: Money,
    pub submitted_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(
        transaction_id: TransactionId,
        transaction_date: NaiveDate,
        expense_id: Option<u64>,
        amount: Money,
    ) -> Self {
        Self {
            transaction_id,
            transaction_date,
            expense_id,
            amount,
            submitted_at: Utc::now(),
        }
    }
}

/// Tracks which source transactions were already submitted
pub trait SubmissionLedger {
    fn contains(&self, transaction_id: &TransactionId) -> bool;

    fn record(&self, entry: &LedgerEntry) -> SyncResult<()>;
}

/// Ledger backed by a JSONL file
pub struct FileLedger {
    path: PathBuf,
    seen: Mutex<HashSet<TransactionId>>,
}

impl FileLedger {
    /// Open the ledger, loading the ids of every recorded entry
    ///
    /// Unparseable lines are skipped with a warning.
    pub fn open(path: PathBuf) -> SyncResult<Self> {
        let mut seen = HashSet::new();

        if path.exists() {
            let file = File::open(&path)
                .map_err(|e| SyncError::Storage(format!("Failed to open ledger: {}", e)))?;

            for (line_num, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(|e| {
                    SyncError::Storage(format!(
                        "Failed to read ledger line {}: {}",
                        line_num + 1,
                        e
                    ))
                })?;

                if line.trim().is_empty() {
                    continue;
                }

                match serde_json::from_str::<LedgerEntry>(&line) {
                    Ok(entry) => {
                        seen.insert(entry.transaction_id);
                    }
                    Err(e) => warn!(line = line_num + 1, error = %e, "skipping malformed ledger entry"),
                }
            }
        }

        Ok(Self {
            path,
            seen: Mutex::new(seen),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Number of distinct transactions recorded
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries for transactions dated before `keep_from`
    ///
    /// Malformed lines are kept untouched. Returns the number of entries removed.
    pub fn compact(&self, keep_from: NaiveDate) -> SyncResult<usize> {
        let Some(contents) = read_text(&self.path)? else {
            return Ok(0);
        };

        let mut kept = String::with_capacity(contents.len());
        let mut removed = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LedgerEntry>(line) {
                Ok(entry) if entry.transaction_date < keep_from => {
                    removed.push(entry.transaction_id);
                }
                _ => {
                    kept.push_str(line);
                    kept.push('\n');
                }
            }
        }

        if removed.is_empty() {
            return Ok(0);
        }

        write_text_atomic(&self.path, &kept)?;

        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        for id in &removed {
            seen.remove(id);
        }
        Ok(removed.len())
    }
}

impl SubmissionLedger for FileLedger {
    fn contains(&self, transaction_id: &TransactionId) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(transaction_id)
    }

    fn record(&self, entry: &LedgerEntry) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::Storage(format!("Failed to create ledger directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SyncError::Storage(format!("Failed to open ledger: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| SyncError::Json(format!("Failed to serialize ledger entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| SyncError::Storage(format!("Failed to write ledger entry: {}", e)))?;

        file.flush()
            .map_err(|e| SyncError::Storage(format!("Failed to flush ledger: {}", e)))?;

        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(entry.transaction_id.clone());

        Ok(())
    }
}

/// Ledger held in memory (for tests)
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
    offline: bool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail
    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SubmissionLedger for InMemoryLedger {
    fn contains(&self, transaction_id: &TransactionId) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|entry| &entry.transaction_id == transaction_id)
    }

    fn record(&self, entry: &LedgerEntry) -> SyncResult<()> {
        if self.offline {
            return Err(SyncError::Storage("Ledger offline".into()));
        }
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
        Ok(())
    }
}
