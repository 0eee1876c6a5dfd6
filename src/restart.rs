//! Session-preserving shell restart.
//!
//! Captures the open folder windows, force-terminates the file manager and
//! asks the shell to reopen the captured folders once Windows has brought
//! it back:
//! - capture real folder windows (virtual views are dropped)
//! - terminate every file manager process
//! - optionally wait for the shell to reappear
//! - reopen the captured folders, paced

mod options;
mod printing;
mod result;
mod run;

pub use options::{RestartOptions, DEFAULT_EXIT_WAIT, DEFAULT_PACING, FILE_MANAGER_IMAGE};
pub use printing::{print_folder_list, print_summary};
pub use result::{RestartReport, StepResult};
pub use run::{run_restart, FolderCapture, ShellWindowCapture, Stage};
