//! Remote service clients
//!
//! The sync only needs three capabilities from the outside world, expressed
//! as two traits so the orchestrator can run against fakes in tests:
//!
//! - [`BudgetSource`]: list transactions since a date, list category groups
//! - [`ExpenseSink`]: create an expense

pub mod cached;
pub mod splitwise;
pub mod ynab;

pub use cached::CachedBudgetSource;
pub use splitwise::SplitwiseClient;
pub use ynab::YnabClient;

use chrono::NaiveDate;

use crate::error::SyncResult;
use crate::models::{CategoryGroupIndex, CreatedExpense, ExpenseRequest, Transaction};

/// Read side: the budgeting service
pub trait BudgetSource {
    /// Transactions dated on or after `since`
    fn list_transactions_since(&self, since: NaiveDate) -> SyncResult<Vec<Transaction>>;

    /// Category id to category group name
    fn list_category_groups(&self) -> SyncResult<CategoryGroupIndex>;
}

/// Write side: the expense-splitting service
pub trait ExpenseSink {
    fn create_expense(&self, request: &ExpenseRequest) -> SyncResult<CreatedExpense>;
}

impl<T: BudgetSource + ?Sized> BudgetSource for &T {
    fn list_transactions_since(&self, since: NaiveDate) -> SyncResult<Vec<Transaction>> {
        (**self).list_transactions_since(since)
    }

    fn list_category_groups(&self) -> SyncResult<CategoryGroupIndex> {
        (**self).list_category_groups()
    }
}

/// Default timeout for remote calls
pub(crate) const HTTP_TIMEOUT_SECS: u64 = 30;

/// User agent sent to both services
pub(crate) const USER_AGENT: &str = concat!("ynab-splitwise-sync/", env!("CARGO_PKG_VERSION"));
