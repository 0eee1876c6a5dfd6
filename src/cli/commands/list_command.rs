//! List command feature.
//!
//! This module owns and handles the "replorer list" command behavior.

use crate::output::{self, OutputMode};
use crate::restart;
use crate::shell_windows;

pub(crate) fn handle_list(json: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let folders = shell_windows::capture_open_folders();

    if json {
        output::print_json(&folders)?;
    } else {
        restart::print_folder_list(&folders, output_mode);
    }
    Ok(())
}
