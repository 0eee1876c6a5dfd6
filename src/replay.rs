//! Folder window reopening.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("shell refused to open {path} (code {code})")]
    Rejected { path: String, code: isize },

    #[error("opening folders is not supported on this platform")]
    Unsupported,
}

/// Something that can ask the shell to show a folder.
pub trait FolderOpener {
    fn open_folder(&mut self, path: &str) -> Result<(), OpenError>;
}

/// Blocking delay between open requests.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub requested: usize,
    pub failed: usize,
}

/// Issue one open request per path, in order, pausing `pacing` between
/// consecutive requests.
///
/// A failed request is logged and does not stop the remaining ones.
pub fn reopen_folders<O, P>(
    paths: &[String],
    opener: &mut O,
    pacer: &mut P,
    pacing: Duration,
) -> ReplaySummary
where
    O: FolderOpener + ?Sized,
    P: Pacer + ?Sized,
{
    let mut summary = ReplaySummary::default();

    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            pacer.pause(pacing);
        }

        summary.requested += 1;
        match opener.open_folder(path) {
            Ok(()) => tracing::debug!(%path, "open requested"),
            Err(e) => {
                tracing::warn!(error = %e, "open request failed");
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Opens folders through `ShellExecuteW` with the "open" verb.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellOpener;

impl FolderOpener for ShellOpener {
    #[cfg(windows)]
    fn open_folder(&mut self, path: &str) -> Result<(), OpenError> {
        use windows::core::{w, HSTRING, PCWSTR};
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::Shell::ShellExecuteW;
        use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

        let target = HSTRING::from(path);
        let result = unsafe {
            ShellExecuteW(
                HWND::default(),
                w!("open"),
                &target,
                PCWSTR::null(),
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };

        // Values above 32 mean success.
        let code = result.0 as isize;
        if code > 32 {
            Ok(())
        } else {
            Err(OpenError::Rejected {
                path: path.to_string(),
                code,
            })
        }
    }

    #[cfg(not(windows))]
    fn open_folder(&mut self, _path: &str) -> Result<(), OpenError> {
        Err(OpenError::Unsupported)
    }
}
