//! Transaction model
//!
//! A read-only view of a YNAB transaction. Field names follow the YNAB API
//! so records deserialize straight from responses and cached payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};

/// Clearing state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearingStatus {
    /// Not yet settled with the bank; the amount may still change
    Uncleared,
    /// Settled with the bank
    Cleared,
    /// Settled and locked by a reconciliation
    Reconciled,
}

impl fmt::Display for ClearingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncleared => write!(f, "Uncleared"),
            Self::Cleared => write!(f, "Cleared"),
            Self::Reconciled => write!(f, "Reconciled"),
        }
    }
}

/// A financial transaction from the budgeting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount in source minor units (negative for outflow)
    pub amount: i64,

    /// Clearing state
    pub cleared: ClearingStatus,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default)]
    pub payee_name: Option<String>,

    #[serde(default)]
    pub memo: Option<String>,

    /// Set on transactions removed in the budgeting service
    #[serde(default)]
    pub deleted: bool,
}

impl Transaction {
    /// Check if this is an outflow (negative amount)
    pub fn is_outflow(&self) -> bool {
        self.amount < 0
    }

    /// Check if the transaction has settled (exactly `cleared`)
    pub fn is_cleared(&self) -> bool {
        self.cleared == ClearingStatus::Cleared
    }

    /// Case-insensitive substring search in the memo
    ///
    /// `marker_lower` must already be lowercase.
    pub fn memo_contains(&self, marker_lower: &str) -> bool {
        self.memo
            .as_deref()
            .map(|memo| memo.to_lowercase().contains(marker_lower))
            .unwrap_or(false)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date.format("%Y-%m-%d"),
            self.payee_name.as_deref().unwrap_or("(no payee)"),
            self.amount,
            self.id
        )
    }
}
