//! ynab-splitwise-sync - incremental YNAB to Splitwise expense sync
//!
//! A cron-style batch job: each run picks up the shared transactions recorded
//! in YNAB since the last successful run and creates an equally-split expense
//! for each in a Splitwise group.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings, credentials and the category mapping
//! - `error`: Custom error types
//! - `models`: Transactions, category groups and expense requests
//! - `storage`: Watermark, day-scoped response cache and submission ledger
//! - `clients`: YNAB and Splitwise clients behind capability traits
//! - `services`: Selection, materialization and the sync orchestrator
//! - `display`: Terminal formatting of sync reports
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use ynab_splitwise_sync::config::{Settings, SyncPaths};
//!
//! let paths = SyncPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod clients;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SyncError, SyncResult};
