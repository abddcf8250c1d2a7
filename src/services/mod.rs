//! Service layer for ynab-splitwise-sync
//!
//! The sync pipeline: selection rules, expense materialization, and the
//! orchestrator that drives them against the storage and client layers.

pub mod materializer;
pub mod selector;
pub mod sync;

pub use materializer::ExpenseMaterializer;
pub use selector::{Selected, TransactionSelector};
pub use sync::{SyncOptions, SyncReport, SyncService};
