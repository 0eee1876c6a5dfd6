use crate::restart::{RestartOptions, DEFAULT_EXIT_WAIT, DEFAULT_PACING};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Delay between folder open requests
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// How long to wait for each terminated process to exit
    #[serde(default = "default_exit_wait_ms")]
    pub exit_wait_ms: u64,

    /// Wait up to this long for the shell to come back before reopening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relaunch_wait_ms: Option<u64>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            exit_wait_ms: default_exit_wait_ms(),
            relaunch_wait_ms: None,
        }
    }
}

fn default_pacing_ms() -> u64 {
    DEFAULT_PACING.as_millis() as u64
}

fn default_exit_wait_ms() -> u64 {
    DEFAULT_EXIT_WAIT.as_millis() as u64
}

impl Config {
    /// Get the config file path: %APPDATA%\replorer\config.toml
    pub fn config_path() -> Result<PathBuf> {
        let appdata = std::env::var("APPDATA")
            .context("APPDATA environment variable not set")?;
        let config_dir = PathBuf::from(appdata).join("replorer");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Self::default(),
        }
    }

    /// Load config from `path`. A missing file gives defaults; an unreadable
    /// or malformed one gives defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, toml)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Apply CLI option overrides
    pub fn apply_cli_overrides(
        &mut self,
        pacing_ms: Option<u64>,
        exit_wait_ms: Option<u64>,
        wait_for_shell_secs: Option<u64>,
    ) {
        if let Some(ms) = pacing_ms {
            self.timing.pacing_ms = ms;
        }
        if let Some(ms) = exit_wait_ms {
            self.timing.exit_wait_ms = ms;
        }
        if let Some(secs) = wait_for_shell_secs {
            self.timing.relaunch_wait_ms = Some(secs.saturating_mul(1000));
        }
    }

    /// Resolve the settings for one restart
    pub fn restart_options(&self, dry_run: bool) -> RestartOptions {
        RestartOptions {
            pacing: Duration::from_millis(self.timing.pacing_ms),
            exit_wait: Duration::from_millis(self.timing.exit_wait_ms),
            relaunch_wait: self
                .timing
                .relaunch_wait_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            dry_run,
            ..RestartOptions::default()
        }
    }
}
