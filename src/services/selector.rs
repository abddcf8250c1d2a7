//! Transaction selection
//!
//! Decides which source transactions become shared expenses. A transaction
//! qualifies when it is cleared, is an outflow, is not deleted, and is either
//! in the shared category group or carries the memo marker.

use crate::models::{CategoryGroupIndex, CategoryId, Transaction};

/// A transaction picked for export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selected<'a> {
    pub transaction: &'a Transaction,
    /// The transaction's category; memo matches may have none
    pub category_id: Option<&'a CategoryId>,
}

/// Selection rules
#[derive(Debug, Clone)]
pub struct TransactionSelector {
    target_group_name: String,
    memo_marker_lower: String,
}

impl TransactionSelector {
    pub fn new(target_group_name: impl Into<String>, memo_marker: &str) -> Self {
        Self {
            target_group_name: target_group_name.into(),
            memo_marker_lower: memo_marker.to_lowercase(),
        }
    }

    /// Check a single transaction against the rules
    pub fn qualifies(&self, txn: &Transaction, index: &CategoryGroupIndex) -> bool {
        if txn.deleted || !txn.is_cleared() || !txn.is_outflow() {
            return false;
        }

        let in_target_group = txn
            .category_id
            .as_ref()
            .and_then(|id| index.group_name(id))
            .is_some_and(|group| group == self.target_group_name);

        in_target_group || txn.memo_contains(&self.memo_marker_lower)
    }

    /// Lazily filter `transactions`, preserving input order
    ///
    /// Yielded items borrow only the transactions, so they may outlive the
    /// selector and the index.
    pub fn select<'s, 't, I>(
        &'s self,
        transactions: I,
        index: &'s CategoryGroupIndex,
    ) -> impl Iterator<Item = Selected<'t>> + 's
    where
        I: IntoIterator<Item = &'t Transaction>,
        I::IntoIter: 's,
        't: 's,
    {
        transactions
            .into_iter()
            .filter(move |txn| self.qualifies(txn, index))
            .map(|txn| Selected {
                transaction: txn,
                category_id: txn.category_id.as_ref(),
            })
    }
}
