//! Open folder window capture.
//!
//! Enumerates the shell's top-level windows and keeps the ones that show a
//! real directory. On Windows this goes through the `ShellWindows` COM
//! automation object; COM is initialized for the duration of the capture
//! only and every interface pointer is released as soon as it goes out of
//! scope.

use crate::url_path::file_url_to_path;
use thiserror::Error;

/// Paths of the real folder windows, in window enumeration order.
pub type OpenFolderList = Vec<String>;

/// Failures of the automation layer. None of them are fatal: capture
/// degrades to an empty list.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("shell window automation is not available on this platform")]
    Unsupported,

    #[error("failed to create the shell window collection: {0}")]
    Collection(String),

    #[error("failed to read the shell window count: {0}")]
    Count(String),
}

/// Indexed view over the shell's live windows.
pub trait WindowCollection {
    /// Number of windows in the collection at the time of the call.
    fn count(&self) -> usize;

    /// Location URL of the window at `index`.
    ///
    /// `None` when the window is gone, is not a browser window, or has no
    /// location.
    fn location_url(&self, index: usize) -> Option<String>;
}

/// Build the open folder list from a window collection.
///
/// Windows whose location is missing or does not decode to a filesystem
/// path are treated as virtual and left out.
pub fn collect_open_folders<C: WindowCollection + ?Sized>(windows: &C) -> OpenFolderList {
    let count = windows.count();
    tracing::debug!(count, "enumerating shell windows");

    let mut folders = Vec::new();
    for index in 0..count {
        let Some(url) = windows.location_url(index) else {
            tracing::trace!(index, "window has no browser location, skipping");
            continue;
        };

        match file_url_to_path(&url) {
            Some(path) => {
                tracing::debug!(index, %path, "captured folder window");
                folders.push(path);
            }
            None => tracing::debug!(index, %url, "virtual window, skipping"),
        }
    }

    folders
}

/// Capture the folder windows of the current session.
///
/// Any automation failure results in an empty list.
pub fn capture_open_folders() -> OpenFolderList {
    match platform::capture() {
        Ok(folders) => folders,
        Err(e) => {
            tracing::warn!(error = %e, "shell window automation unavailable");
            Vec::new()
        }
    }
}

#[cfg(windows)]
mod platform {
    use super::{collect_open_folders, AutomationError, OpenFolderList, WindowCollection};
    use windows::core::{Interface, VARIANT};
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED,
        COINIT_DISABLE_OLE1DDE,
    };
    use windows::Win32::UI::Shell::{IShellWindows, IWebBrowserApp, ShellWindows};

    /// COM apartment for the current thread, torn down on drop.
    struct ComApartment {
        initialized: bool,
    }

    impl ComApartment {
        fn enter() -> Self {
            let hr = unsafe {
                CoInitializeEx(None, COINIT_APARTMENTTHREADED | COINIT_DISABLE_OLE1DDE)
            };
            // S_FALSE (already initialized) still needs a matching uninit;
            // RPC_E_CHANGED_MODE does not.
            Self {
                initialized: hr.is_ok(),
            }
        }
    }

    impl Drop for ComApartment {
        fn drop(&mut self) {
            if self.initialized {
                unsafe { CoUninitialize() };
            }
        }
    }

    struct ComShellWindows {
        inner: IShellWindows,
    }

    impl ComShellWindows {
        fn create() -> Result<Self, AutomationError> {
            let inner: IShellWindows = unsafe { CoCreateInstance(&ShellWindows, None, CLSCTX_ALL) }
                .map_err(|e| AutomationError::Collection(e.to_string()))?;
            Ok(Self { inner })
        }

        fn checked_count(&self) -> Result<usize, AutomationError> {
            let count =
                unsafe { self.inner.Count() }.map_err(|e| AutomationError::Count(e.to_string()))?;
            Ok(usize::try_from(count).unwrap_or(0))
        }
    }

    impl WindowCollection for ComShellWindows {
        fn count(&self) -> usize {
            self.checked_count().unwrap_or(0)
        }

        fn location_url(&self, index: usize) -> Option<String> {
            let index = i32::try_from(index).ok()?;
            // The IDispatch, IWebBrowserApp and BSTR are all released on drop,
            // whichever branch returns.
            let window = unsafe { self.inner.Item(&VARIANT::from(index)) }.ok()?;
            let browser: IWebBrowserApp = window.cast().ok()?;
            let url = unsafe { browser.LocationURL() }.ok()?;
            if url.is_empty() {
                None
            } else {
                Some(url.to_string())
            }
        }
    }

    pub(super) fn capture() -> Result<OpenFolderList, AutomationError> {
        let _apartment = ComApartment::enter();
        let windows = ComShellWindows::create()?;
        windows.checked_count()?;
        Ok(collect_open_folders(&windows))
        // `windows` drops before `_apartment`, so the collection is released
        // while COM is still initialized.
    }
}

#[cfg(not(windows))]
mod platform {
    use super::{AutomationError, OpenFolderList};

    pub(super) fn capture() -> Result<OpenFolderList, AutomationError> {
        Err(AutomationError::Unsupported)
    }
}
