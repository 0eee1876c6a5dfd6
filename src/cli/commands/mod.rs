//! Command feature handlers.
//!
//! Each module owns one command feature.

pub mod config_command;
pub mod list_command;
pub mod restart_command;
