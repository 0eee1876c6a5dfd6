//! Restart command feature.
//!
//! This module owns and handles the "replorer restart" command behavior.

use crate::config::Config;
use crate::output::{self, OutputMode};
use crate::reaper::SystemProcessTable;
use crate::replay::{ShellOpener, ThreadPacer};
use crate::restart::{self, ShellWindowCapture};
use crate::theme::Theme;

pub(crate) fn handle_restart(
    dry_run: bool,
    pacing_ms: Option<u64>,
    exit_wait_ms: Option<u64>,
    wait_for_shell: Option<u64>,
    json: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let mut config = Config::load();
    config.apply_cli_overrides(pacing_ms, exit_wait_ms, wait_for_shell);
    let options = config.restart_options(dry_run);

    // JSON goes to stdout on its own
    let progress_mode = if json { OutputMode::Quiet } else { output_mode };

    if progress_mode != OutputMode::Quiet {
        println!();
        println!("{}", Theme::header("Explorer Restart"));
        println!("{}", Theme::divider_bold(60));
        if dry_run {
            println!("{}", Theme::warning("DRY RUN MODE - No changes will be made"));
        }
        println!();
    }

    let report = restart::run_restart(
        &options,
        &mut ShellWindowCapture,
        &mut SystemProcessTable::new(),
        &mut ShellOpener,
        &mut ThreadPacer,
        progress_mode,
    );

    if json {
        output::print_json(&report)?;
    } else {
        restart::print_summary(&report, output_mode);
    }
    Ok(())
}
