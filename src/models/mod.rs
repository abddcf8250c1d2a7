//! Core data models for ynab-splitwise-sync
//!
//! Source-side records (transactions, category groups) and the expense
//! records derived from them.

pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod transaction;

pub use category::{Category, CategoryGroup, CategoryGroupIndex};
pub use expense::{CreatedExpense, ExpenseRequest};
pub use ids::{CategoryId, TransactionId};
pub use money::Money;
pub use transaction::{ClearingStatus, Transaction};
