//! Restart tuning knobs.

use std::time::Duration;

/// Image name of the shell's file manager.
pub const FILE_MANAGER_IMAGE: &str = "explorer.exe";

/// Delay between consecutive folder open requests.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// How long to wait for each terminated process to exit.
pub const DEFAULT_EXIT_WAIT: Duration = Duration::from_millis(2000);

/// Poll interval while waiting for the shell to come back.
pub const RELAUNCH_POLL: Duration = Duration::from_millis(250);

/// Fully resolved settings for one restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartOptions {
    pub image_name: String,
    pub pacing: Duration,
    pub exit_wait: Duration,
    pub exit_code: u32,
    /// Upper bound on waiting for the shell to reappear before replay.
    /// `None` reopens immediately.
    pub relaunch_wait: Option<Duration>,
    pub dry_run: bool,
}

impl Default for RestartOptions {
    fn default() -> Self {
        Self {
            image_name: FILE_MANAGER_IMAGE.to_string(),
            pacing: DEFAULT_PACING,
            exit_wait: DEFAULT_EXIT_WAIT,
            exit_code: 0,
            relaunch_wait: None,
            dry_run: false,
        }
    }
}
