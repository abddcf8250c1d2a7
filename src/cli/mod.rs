//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod status;
pub mod sync;

pub use status::{handle_config_command, handle_status_command};
pub use sync::handle_sync_command;
