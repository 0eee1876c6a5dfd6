//! Restart output formatting.

use super::result::{RestartReport, StepResult};
use crate::output::OutputMode;
use crate::theme::Theme;

pub(crate) fn print_operation_start(message: &str, output_mode: OutputMode) {
    if output_mode != OutputMode::Quiet {
        print!("  {} ", Theme::muted("→"));
        print!("{}", message);
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }
}

pub(crate) fn print_operation_result(result: &StepResult, output_mode: OutputMode) {
    if output_mode == OutputMode::Quiet {
        return;
    }

    // Clear the line and print result
    print!("\r\x1b[2K");

    if result.success {
        if result.is_skipped() {
            println!(
                "  {} {} - {}",
                Theme::muted("○"),
                result.action,
                Theme::muted(&result.message)
            );
        } else {
            println!(
                "  {} {} - {}",
                Theme::success("✓"),
                result.action,
                Theme::success(&result.message)
            );
        }
    } else {
        println!(
            "  {} {} - {}",
            Theme::error("✗"),
            result.action,
            Theme::error(&result.message)
        );
    }
}

/// Print the captured folders, one per line.
pub fn print_folder_list(folders: &[String], output_mode: OutputMode) {
    if output_mode == OutputMode::Quiet {
        return;
    }

    if folders.is_empty() {
        println!("{}", Theme::muted("No folder windows are open."));
        return;
    }

    for (i, folder) in folders.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, Theme::value(folder));
    }
}

/// Print summary of a restart
pub fn print_summary(report: &RestartReport, output_mode: OutputMode) {
    if output_mode == OutputMode::Quiet {
        return;
    }

    if output_mode >= OutputMode::Verbose && !report.folders.is_empty() {
        println!();
        println!("{}", Theme::primary("Captured folders:"));
        print_folder_list(&report.folders, output_mode);
    }

    let failed = report.steps.iter().filter(|s| !s.success).count();

    println!();
    println!("{}", Theme::divider(60));
    println!(
        "{}",
        Theme::primary(&format!(
            "Summary: {} folder(s) captured, {} process(es) terminated, {} reopened, {} warning(s)",
            report.folders.len(),
            report.processes.terminated,
            report.open_requests(),
            failed
        ))
    );

    if report.dry_run {
        println!("{}", Theme::warning("Dry run - nothing was changed."));
    } else if report.processes.matched == 0 {
        println!();
        println!(
            "{}",
            Theme::warning("Note: no file manager process was running; Windows may not start one.")
        );
    }
}
