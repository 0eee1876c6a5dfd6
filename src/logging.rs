//! Diagnostic logging setup.
//!
//! User-facing progress goes through `OutputMode` printing; `tracing` events
//! carry the per-window and per-process detail and go to stderr.

use crate::output::OutputMode;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(output_mode: OutputMode) -> &'static str {
    match output_mode {
        OutputMode::Quiet => "error",
        OutputMode::Normal => "warn",
        OutputMode::Verbose => "replorer=debug,warn",
        OutputMode::VeryVerbose => "replorer=trace,info",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the mode-derived
/// filter.
pub fn init_logging(output_mode: OutputMode) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(output_mode)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
