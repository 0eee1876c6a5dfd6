//! Replorer library crate
//!
//! Restarts Windows Explorer while keeping the user's open folder windows.
//! The binary is a thin CLI over [`restart::run_restart`]; every OS boundary
//! sits behind a trait so the restart sequence can be driven programmatically.

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod progress;
pub mod reaper;
pub mod replay;
pub mod restart;
pub mod shell_windows;
pub mod spinner;
pub mod theme;
pub mod url_path;
