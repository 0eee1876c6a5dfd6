//! Integration tests for replorer
//!
//! These drive the full restart sequence through the public API with
//! in-memory stand-ins for the shell, the process table and the opener.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::time::Duration;
use replorer::config::Config;
use replorer::output::OutputMode;
use replorer::reaper::{ProcessRecord, ProcessTable, ReapError};
use replorer::replay::{FolderOpener, OpenError, Pacer};
use replorer::restart::{self, FolderCapture, RestartOptions};
use replorer::shell_windows::{collect_open_folders, OpenFolderList, WindowCollection};
use replorer::url_path::file_url_to_path;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Terminate(u32),
    Open(String),
    Pause(Duration),
}

type Log = Rc<RefCell<Vec<Call>>>;

struct Windows(Vec<&'static str>);

impl WindowCollection for Windows {
    fn count(&self) -> usize {
        self.0.len()
    }

    fn location_url(&self, index: usize) -> Option<String> {
        Some(self.0[index].to_string())
    }
}

impl FolderCapture for Windows {
    fn capture(&mut self) -> OpenFolderList {
        collect_open_folders(&*self)
    }
}

struct Table {
    processes: Vec<ProcessRecord>,
    log: Log,
}

impl ProcessTable for Table {
    fn snapshot(&mut self) -> Vec<ProcessRecord> {
        self.processes.clone()
    }

    fn terminate(&mut self, pid: u32, _exit_code: u32, _wait: Duration) -> Result<(), ReapError> {
        self.log.borrow_mut().push(Call::Terminate(pid));
        if pid == 666 {
            return Err(ReapError::Open {
                pid,
                reason: "access denied".to_string(),
            });
        }
        Ok(())
    }
}

struct Shell(Log);

impl FolderOpener for Shell {
    fn open_folder(&mut self, path: &str) -> Result<(), OpenError> {
        self.0.borrow_mut().push(Call::Open(path.to_string()));
        Ok(())
    }
}

impl Pacer for Shell {
    fn pause(&mut self, delay: Duration) {
        self.0.borrow_mut().push(Call::Pause(delay));
    }
}

fn process(pid: u32, name: &str) -> ProcessRecord {
    ProcessRecord {
        pid,
        name: name.to_string(),
    }
}

fn run(
    windows: Vec<&'static str>,
    processes: Vec<ProcessRecord>,
) -> (restart::RestartReport, Vec<Call>) {
    let log: Log = Rc::default();
    let report = restart::run_restart(
        &RestartOptions::default(),
        &mut Windows(windows),
        &mut Table {
            processes,
            log: log.clone(),
        },
        &mut Shell(log.clone()),
        &mut Shell(log.clone()),
        OutputMode::Quiet,
    );
    let calls = log.borrow().clone();
    (report, calls)
}

#[test]
fn test_restart_reopens_captured_folders_in_order() {
    let (report, calls) = run(
        vec![
            "file:///C:/Users/A/Documents",
            "::{20D04FE0-3AEA-1069-A2D8-08002B30309D}",
            "file:///C:/Projects",
        ],
        vec![
            process(100, "EXPLORER.EXE"),
            process(200, "svchost.exe"),
            process(300, "explorer.exe"),
        ],
    );

    assert_eq!(
        calls,
        vec![
            Call::Terminate(100),
            Call::Terminate(300),
            Call::Open("C:\\Users\\A\\Documents".to_string()),
            Call::Pause(Duration::from_millis(100)),
            Call::Open("C:\\Projects".to_string()),
        ]
    );
    assert_eq!(report.folders, vec!["C:\\Users\\A\\Documents", "C:\\Projects"]);
    assert_eq!(report.open_requests(), 2);
}

#[test]
fn test_restart_with_only_virtual_windows_skips_replay() {
    let (report, calls) = run(
        vec!["::{20D04FE0-3AEA-1069-A2D8-08002B30309D}"],
        vec![process(100, "explorer.exe")],
    );

    assert_eq!(calls, vec![Call::Terminate(100)]);
    assert!(report.folders.is_empty());
    assert!(report.replay.is_none());
}

#[test]
fn test_restart_with_no_shell_running_still_replays() {
    let (report, calls) = run(vec!["file:///D:/Work"], Vec::new());

    assert_eq!(calls, vec![Call::Open("D:\\Work".to_string())]);
    assert_eq!(report.processes.matched, 0);
}

#[test]
fn test_termination_failure_does_not_abort() {
    let (report, calls) = run(
        vec!["file:///C:/A"],
        vec![process(666, "explorer.exe"), process(7, "explorer.exe")],
    );

    assert_eq!(report.processes.failed, 1);
    assert_eq!(report.processes.terminated, 1);
    assert_eq!(calls.last(), Some(&Call::Open("C:\\A".to_string())));
}

#[test]
fn test_report_serializes_to_json() {
    let (report, _) = run(vec!["file:///C:/A"], vec![process(1, "explorer.exe")]);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["folders"][0], "C:\\A");
    assert_eq!(json["processes"]["terminated"], 1);
    assert_eq!(json["replay"]["requested"], 1);
    assert_eq!(json["dry_run"], false);
}

#[test]
fn test_codec_round_trips_escaped_paths() {
    fn to_file_url(path: &str) -> String {
        let mut url = String::from("file:///");
        for ch in path.chars() {
            match ch {
                '\\' => url.push('/'),
                ' ' | '%' | '#' | '+' | '&' => url.push_str(&format!("%{:02X}", ch as u32)),
                other => url.push(other),
            }
        }
        url
    }

    for path in [
        "C:\\Users\\A\\Documents",
        "C:\\My Projects\\50% done",
        "D:\\music\\AC+DC & friends\\#1",
        "E:\\Фото\\2024",
    ] {
        assert_eq!(file_url_to_path(&to_file_url(path)).as_deref(), Some(path));
    }
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[timing]\npacing_ms = 250\nrelaunch_wait_ms = 8000\n").unwrap();

    let options = Config::load_from(&path).restart_options(false);

    assert_eq!(options.pacing, Duration::from_millis(250));
    assert_eq!(options.exit_wait, Duration::from_millis(2000));
    assert_eq!(options.relaunch_wait, Some(Duration::from_secs(8)));
}

#[test]
fn test_config_missing_or_broken_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let missing = Config::load_from(&dir.path().join("nope.toml"));
    assert_eq!(missing, Config::default());

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "[timing\npacing_ms = ").unwrap();
    assert_eq!(Config::load_from(&broken), Config::default());
}

#[test]
fn test_config_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.apply_cli_overrides(Some(50), None, Some(3));
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path), config);
}
