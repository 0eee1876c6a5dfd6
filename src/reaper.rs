//! File manager process termination.
//!
//! Takes one snapshot of the process table and force-terminates every entry
//! whose image name matches the file manager. Failures are logged and
//! skipped. Nothing here starts the file manager again; Windows relaunches
//! the shell on its own.

use serde::Serialize;
use std::time::{Duration, Instant};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use thiserror::Error;

/// One entry of a process snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ReapError {
    #[error("cannot open process {pid}: {reason}")]
    Open { pid: u32, reason: String },

    #[error("cannot terminate process {pid}: {reason}")]
    Terminate { pid: u32, reason: String },

    #[error("process {pid} did not exit within {waited:?}")]
    StillRunning { pid: u32, waited: Duration },
}

/// Access to the OS process table.
pub trait ProcessTable {
    /// Point-in-time listing of running processes.
    fn snapshot(&mut self) -> Vec<ProcessRecord>;

    /// Force-terminate `pid` with `exit_code` and wait up to `wait` for it
    /// to exit.
    fn terminate(&mut self, pid: u32, exit_code: u32, wait: Duration) -> Result<(), ReapError>;
}

/// Outcome of a termination pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReapSummary {
    pub matched: usize,
    pub terminated: usize,
    pub failed: usize,
    /// Pids of every matching process in the snapshot, terminated or not.
    pub pids: Vec<u32>,
}

/// Case-insensitive image name comparison.
pub fn is_target_image(name: &str, image_name: &str) -> bool {
    name.eq_ignore_ascii_case(image_name)
}

/// Terminate every process named `image_name` found in one snapshot.
///
/// Each match gets exactly one termination attempt. A failed attempt is
/// counted and the pass moves on.
pub fn terminate_all<T: ProcessTable + ?Sized>(
    table: &mut T,
    image_name: &str,
    exit_code: u32,
    wait: Duration,
) -> ReapSummary {
    let targets: Vec<ProcessRecord> = table
        .snapshot()
        .into_iter()
        .filter(|p| is_target_image(&p.name, image_name))
        .collect();

    let mut summary = ReapSummary {
        matched: targets.len(),
        pids: targets.iter().map(|p| p.pid).collect(),
        ..ReapSummary::default()
    };

    for process in &targets {
        match table.terminate(process.pid, exit_code, wait) {
            Ok(()) => {
                tracing::debug!(pid = process.pid, name = %process.name, "terminated");
                summary.terminated += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping process");
                summary.failed += 1;
            }
        }
    }

    summary
}

/// List the processes named `image_name` without touching them.
pub fn find_instances<T: ProcessTable + ?Sized>(
    table: &mut T,
    image_name: &str,
) -> Vec<ProcessRecord> {
    table
        .snapshot()
        .into_iter()
        .filter(|p| is_target_image(&p.name, image_name))
        .collect()
}

/// Poll the process table until a new instance of `image_name` shows up.
///
/// Processes listed in `previous` (the pids seen before termination) do not
/// count, so an instance that survived termination is not mistaken for a
/// relaunch. Returns `true` once a new pid is seen, `false` if `timeout`
/// elapses first.
pub fn wait_for_instance<T: ProcessTable + ?Sized>(
    table: &mut T,
    image_name: &str,
    previous: &[u32],
    timeout: Duration,
    poll: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        let relaunched = find_instances(table, image_name)
            .iter()
            .any(|p| !previous.contains(&p.pid));
        if relaunched {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(poll.min(deadline - now));
    }
}

/// Process table backed by `sysinfo` snapshots.
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::new().with_processes(ProcessRefreshKind::new()),
            ),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcessTable {
    fn snapshot(&mut self) -> Vec<ProcessRecord> {
        self.system
            .refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::new());
        self.system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessRecord {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
            })
            .collect()
    }

    fn terminate(&mut self, pid: u32, exit_code: u32, wait: Duration) -> Result<(), ReapError> {
        platform::terminate(&mut self.system, pid, exit_code, wait)
    }
}

#[cfg(windows)]
mod platform {
    use super::ReapError;
    use std::time::Duration;
    use sysinfo::System;
    use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_OBJECT_0};
    use windows::Win32::System::Threading::{
        OpenProcess, TerminateProcess, WaitForSingleObject, PROCESS_SYNCHRONIZE,
        PROCESS_TERMINATE,
    };

    /// Process handle closed on drop.
    struct OwnedProcess(HANDLE);

    impl Drop for OwnedProcess {
        fn drop(&mut self) {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }

    pub(super) fn terminate(
        _system: &mut System,
        pid: u32,
        exit_code: u32,
        wait: Duration,
    ) -> Result<(), ReapError> {
        let handle = unsafe { OpenProcess(PROCESS_TERMINATE | PROCESS_SYNCHRONIZE, false, pid) }
            .map_err(|e| ReapError::Open {
                pid,
                reason: e.to_string(),
            })?;
        let process = OwnedProcess(handle);

        unsafe { TerminateProcess(process.0, exit_code) }.map_err(|e| ReapError::Terminate {
            pid,
            reason: e.to_string(),
        })?;

        let millis = u32::try_from(wait.as_millis()).unwrap_or(u32::MAX);
        if unsafe { WaitForSingleObject(process.0, millis) } == WAIT_OBJECT_0 {
            Ok(())
        } else {
            Err(ReapError::StillRunning { pid, waited: wait })
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::ReapError;
    use std::time::{Duration, Instant};
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

    const POLL: Duration = Duration::from_millis(50);

    // Exit codes cannot be imposed on another process here; SIGKILL it is.
    pub(super) fn terminate(
        system: &mut System,
        pid: u32,
        _exit_code: u32,
        wait: Duration,
    ) -> Result<(), ReapError> {
        let target = Pid::from_u32(pid);
        let process = system.process(target).ok_or_else(|| ReapError::Open {
            pid,
            reason: "process not found".to_string(),
        })?;

        match process.kill_with(Signal::Kill) {
            Some(true) => {}
            _ => {
                return Err(ReapError::Terminate {
                    pid,
                    reason: "kill signal was not delivered".to_string(),
                })
            }
        }

        let deadline = Instant::now() + wait;
        loop {
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[target]),
                true,
                ProcessRefreshKind::new(),
            );
            if system.process(target).is_none() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ReapError::StillRunning { pid, waited: wait });
            }
            std::thread::sleep(POLL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeTable {
        processes: Vec<ProcessRecord>,
        deny: Vec<u32>,
        attempts: Vec<(u32, u32, Duration)>,
    }

    impl FakeTable {
        fn with(processes: &[(u32, &str)]) -> Self {
            Self {
                processes: processes
                    .iter()
                    .map(|(pid, name)| ProcessRecord {
                        pid: *pid,
                        name: name.to_string(),
                    })
                    .collect(),
                ..Self::default()
            }
        }
    }

    impl ProcessTable for FakeTable {
        fn snapshot(&mut self) -> Vec<ProcessRecord> {
            self.processes.clone()
        }

        fn terminate(&mut self, pid: u32, exit_code: u32, wait: Duration) -> Result<(), ReapError> {
            self.attempts.push((pid, exit_code, wait));
            if self.deny.contains(&pid) {
                Err(ReapError::Open {
                    pid,
                    reason: "access denied".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    const WAIT: Duration = Duration::from_millis(2000);

    #[test]
    fn test_no_matching_processes() {
        let mut table = FakeTable::with(&[(4, "System"), (100, "notepad.exe")]);
        let summary = terminate_all(&mut table, "explorer.exe", 0, WAIT);
        assert_eq!(summary, ReapSummary::default());
        assert!(summary.pids.is_empty());
        assert!(table.attempts.is_empty());
    }

    #[test]
    fn test_matches_case_insensitively_once_each() {
        let mut table = FakeTable::with(&[
            (10, "EXPLORER.EXE"),
            (11, "notepad.exe"),
            (12, "explorer.exe"),
            (13, "Explorer.exe"),
            (14, "explorer.exe.bak"),
        ]);

        let summary = terminate_all(&mut table, "explorer.exe", 0, WAIT);

        assert_eq!(summary.matched, 3);
        assert_eq!(summary.terminated, 3);
        assert_eq!(summary.pids, vec![10, 12, 13]);
        assert_eq!(
            table.attempts,
            vec![(10, 0, WAIT), (12, 0, WAIT), (13, 0, WAIT)]
        );
    }

    #[test]
    fn test_failures_do_not_stop_the_pass() {
        let mut table = FakeTable::with(&[(1, "explorer.exe"), (2, "explorer.exe")]);
        table.deny.push(1);

        let summary = terminate_all(&mut table, "explorer.exe", 0, WAIT);

        assert_eq!(
            summary,
            ReapSummary {
                matched: 2,
                terminated: 1,
                failed: 1,
                pids: vec![1, 2],
            }
        );
        assert_eq!(table.attempts.len(), 2);
    }

    #[test]
    fn test_find_instances_does_not_terminate() {
        let mut table = FakeTable::with(&[(1, "explorer.exe"), (2, "cmd.exe")]);
        let found = find_instances(&mut table, "Explorer.EXE");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pid, 1);
        assert!(table.attempts.is_empty());
    }

    #[test]
    fn test_wait_for_instance_sees_new_process() {
        let mut table = FakeTable::with(&[(7, "explorer.exe"), (8, "explorer.exe")]);
        assert!(wait_for_instance(
            &mut table,
            "explorer.exe",
            &[7],
            Duration::from_secs(5),
            Duration::from_millis(10)
        ));
    }

    #[test]
    fn test_wait_for_instance_ignores_surviving_process() {
        let mut table = FakeTable::with(&[(666, "explorer.exe")]);
        table.deny.push(666);
        let summary = terminate_all(&mut table, "explorer.exe", 0, WAIT);
        assert_eq!(summary.failed, 1);

        let started = Instant::now();
        assert!(!wait_for_instance(
            &mut table,
            "explorer.exe",
            &summary.pids,
            Duration::from_millis(60),
            Duration::from_millis(10)
        ));
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_wait_for_instance_times_out() {
        let mut table = FakeTable::with(&[(7, "cmd.exe")]);
        let started = Instant::now();
        assert!(!wait_for_instance(
            &mut table,
            "explorer.exe",
            &[],
            Duration::from_millis(30),
            Duration::from_millis(10)
        ));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_system_table_lists_current_process() {
        let mut table = SystemProcessTable::new();
        let me = std::process::id();
        assert!(table.snapshot().iter().any(|p| p.pid == me));
    }
}
