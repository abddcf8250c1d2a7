//! Configuration module for ynab-splitwise-sync
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Credentials from the environment
//! - The category mapping table

pub mod category_map;
pub mod credentials;
pub mod paths;
pub mod settings;

pub use category_map::CategoryMap;
pub use credentials::Credentials;
pub use paths::SyncPaths;
pub use settings::{Settings, WatermarkPolicy};
