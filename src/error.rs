//! Custom error types for ynab-splitwise-sync
//!
//! This module defines the error hierarchy for the sync job using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential was not provided in the environment
    #[error("{0} is required")]
    MissingCredential(&'static str),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors (watermark, cache and ledger files)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// The budgeting service rejected or failed a read
    #[error("Source API error: {0}")]
    Source(String),

    /// The expense service rejected or failed a write
    #[error("Destination API error: {0}")]
    Destination(String),

    /// A transaction lacks a field needed to build an expense
    #[error("Transaction {transaction_id} is missing required field '{field}'")]
    MissingRequiredField {
        transaction_id: String,
        field: &'static str,
    },
}

impl SyncError {
    /// Create a missing-field error for a transaction
    pub fn missing_field(transaction_id: impl Into<String>, field: &'static str) -> Self {
        Self::MissingRequiredField {
            transaction_id: transaction_id.into(),
            field,
        }
    }

    /// Check if this error only affects a single transaction
    ///
    /// Per-item errors are logged and the run continues; everything else
    /// aborts the run before the watermark is committed.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. } | Self::Destination(_)
        )
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
