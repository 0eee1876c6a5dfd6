//! Restart outcome records.

use crate::reaper::ReapSummary;
use crate::replay::ReplaySummary;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Result of one restart step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// Name of the step
    pub action: String,
    /// Whether the step did what it set out to do
    pub success: bool,
    /// Human-readable message about the result
    pub message: String,
}

impl StepResult {
    pub(crate) fn success(action: &str, message: &str) -> Self {
        Self {
            action: action.to_string(),
            success: true,
            message: message.to_string(),
        }
    }

    pub(crate) fn failure(action: &str, message: &str) -> Self {
        Self {
            action: action.to_string(),
            success: false,
            message: message.to_string(),
        }
    }

    pub(crate) fn skipped(action: &str, message: &str) -> Self {
        Self {
            action: action.to_string(),
            success: true, // Skipped is not an error
            message: format!("Skipped: {}", message),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.message.starts_with("Skipped:")
    }
}

/// Everything one restart did.
///
/// Failures inside are informational; a finished restart always counts as
/// a success for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RestartReport {
    pub started_at: DateTime<Local>,
    pub dry_run: bool,
    /// Captured folder paths, in window order.
    pub folders: Vec<String>,
    pub processes: ReapSummary,
    /// `Some` only when a relaunch wait was performed.
    pub shell_relaunched: Option<bool>,
    /// `None` when replay did not run.
    pub replay: Option<ReplaySummary>,
    pub steps: Vec<StepResult>,
}

impl RestartReport {
    pub(crate) fn new(dry_run: bool) -> Self {
        Self {
            started_at: Local::now(),
            dry_run,
            folders: Vec::new(),
            processes: ReapSummary::default(),
            shell_relaunched: None,
            replay: None,
            steps: Vec::new(),
        }
    }

    /// Number of open requests actually issued.
    pub fn open_requests(&self) -> usize {
        self.replay.map_or(0, |r| r.requested)
    }
}
