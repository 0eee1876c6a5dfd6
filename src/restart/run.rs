//! Restart orchestration.

use super::options::{RestartOptions, RELAUNCH_POLL};
use super::printing::{print_operation_result, print_operation_start};
use super::result::{RestartReport, StepResult};
use crate::output::OutputMode;
use crate::progress;
use crate::reaper::{self, ProcessTable};
use crate::replay::{self, FolderOpener, Pacer};
use crate::shell_windows::{self, OpenFolderList};

/// Source of the open folder list.
pub trait FolderCapture {
    fn capture(&mut self) -> OpenFolderList;
}

/// Captures through the shell's window automation interface.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellWindowCapture;

impl FolderCapture for ShellWindowCapture {
    fn capture(&mut self) -> OpenFolderList {
        shell_windows::capture_open_folders()
    }
}

/// Restart stages. Each run goes through them in order and only ever skips
/// `Replay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capture,
    Terminate,
    Replay,
    Done,
}

impl Stage {
    /// Stage that follows `self` given how many folders were captured.
    pub fn next(self, captured: usize) -> Stage {
        match self {
            Stage::Capture => Stage::Terminate,
            Stage::Terminate if captured == 0 => Stage::Done,
            Stage::Terminate => Stage::Replay,
            Stage::Replay | Stage::Done => Stage::Done,
        }
    }
}

/// Run a full restart.
///
/// The file manager is terminated even when no folders were captured, and it
/// is never started from here. Every failure along the way is recorded in the
/// report and the run carries on.
pub fn run_restart<C, T, O, P>(
    options: &RestartOptions,
    capture: &mut C,
    table: &mut T,
    opener: &mut O,
    pacer: &mut P,
    output_mode: OutputMode,
) -> RestartReport
where
    C: FolderCapture + ?Sized,
    T: ProcessTable + ?Sized,
    O: FolderOpener + ?Sized,
    P: Pacer + ?Sized,
{
    let mut report = RestartReport::new(options.dry_run);
    let mut stage = Stage::Capture;

    loop {
        tracing::debug!(?stage, "restart stage");
        match stage {
            Stage::Capture => {
                print_operation_start("Capturing open folder windows...", output_mode);
                report.folders = capture.capture();
                let result = StepResult::success(
                    "Capture folders",
                    &format!("{} folder window(s) found", report.folders.len()),
                );
                print_operation_result(&result, output_mode);
                report.steps.push(result);
            }
            Stage::Terminate => {
                let result = if options.dry_run {
                    terminate_dry_run(options, table, &mut report, output_mode)
                } else {
                    terminate(options, table, &mut report, output_mode)
                };
                print_operation_result(&result, output_mode);
                report.steps.push(result);

                if report.folders.is_empty() {
                    let result =
                        StepResult::skipped("Reopen folders", "no folder windows were open");
                    print_operation_result(&result, output_mode);
                    report.steps.push(result);
                }
            }
            Stage::Replay => {
                if options.dry_run {
                    let result = StepResult::skipped(
                        "Reopen folders",
                        &format!(
                            "Dry run mode - would reopen {} folder(s)",
                            report.folders.len()
                        ),
                    );
                    print_operation_result(&result, output_mode);
                    report.steps.push(result);
                } else {
                    if let Some(timeout) = options.relaunch_wait {
                        let result =
                            wait_for_shell(options, timeout, table, &mut report, output_mode);
                        print_operation_result(&result, output_mode);
                        report.steps.push(result);
                    }

                    print_operation_start("Reopening folders...", output_mode);
                    let summary =
                        replay::reopen_folders(&report.folders, opener, pacer, options.pacing);
                    report.replay = Some(summary);
                    let result = if summary.failed == 0 {
                        StepResult::success(
                            "Reopen folders",
                            &format!("{} open request(s) issued", summary.requested),
                        )
                    } else {
                        StepResult::failure(
                            "Reopen folders",
                            &format!(
                                "{} of {} open request(s) failed",
                                summary.failed, summary.requested
                            ),
                        )
                    };
                    print_operation_result(&result, output_mode);
                    report.steps.push(result);
                }
            }
            Stage::Done => break,
        }
        stage = stage.next(report.folders.len());
    }

    report
}

fn terminate<T: ProcessTable + ?Sized>(
    options: &RestartOptions,
    table: &mut T,
    report: &mut RestartReport,
    output_mode: OutputMode,
) -> StepResult {
    let action = "Terminate file manager";
    print_operation_start(&format!("Terminating {}...", options.image_name), output_mode);

    let summary = reaper::terminate_all(
        table,
        &options.image_name,
        options.exit_code,
        options.exit_wait,
    );
    let result = if summary.matched == 0 {
        StepResult::skipped(action, &format!("no {} process was running", options.image_name))
    } else if summary.failed == 0 {
        StepResult::success(action, &format!("{} process(es) terminated", summary.terminated))
    } else {
        StepResult::failure(
            action,
            &format!(
                "{} of {} process(es) could not be terminated",
                summary.failed, summary.matched
            ),
        )
    };
    report.processes = summary;
    result
}

fn terminate_dry_run<T: ProcessTable + ?Sized>(
    options: &RestartOptions,
    table: &mut T,
    report: &mut RestartReport,
    output_mode: OutputMode,
) -> StepResult {
    print_operation_start(&format!("Looking for {}...", options.image_name), output_mode);
    let found = reaper::find_instances(table, &options.image_name);
    report.processes.matched = found.len();
    report.processes.pids = found.iter().map(|p| p.pid).collect();

    let pids: Vec<String> = found.iter().map(|p| p.pid.to_string()).collect();
    StepResult::skipped(
        "Terminate file manager",
        &format!(
            "Dry run mode - would terminate {} process(es) [{}]",
            found.len(),
            pids.join(", ")
        ),
    )
}

fn wait_for_shell<T: ProcessTable + ?Sized>(
    options: &RestartOptions,
    timeout: std::time::Duration,
    table: &mut T,
    report: &mut RestartReport,
    output_mode: OutputMode,
) -> StepResult {
    let action = "Wait for shell";
    let spinner = (output_mode != OutputMode::Quiet).then(|| {
        progress::create_spinner(&format!("Waiting for {} to restart...", options.image_name))
    });

    // Instances that survived termination are not a relaunch.
    let seen = reaper::wait_for_instance(
        table,
        &options.image_name,
        &report.processes.pids,
        timeout,
        RELAUNCH_POLL,
    );
    report.shell_relaunched = Some(seen);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if seen {
        StepResult::success(action, &format!("{} is running again", options.image_name))
    } else {
        tracing::warn!(?timeout, "shell did not come back, reopening anyway");
        StepResult::failure(
            action,
            &format!(
                "{} not seen within {}s, reopening anyway",
                options.image_name,
                timeout.as_secs_f32()
            ),
        )
    }
}
