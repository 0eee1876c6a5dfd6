//! Config command feature.
//!
//! This module owns and handles the "replorer config" command behavior.

use crate::config::Config;
use crate::output::OutputMode;
use crate::theme::Theme;

pub(crate) fn handle_config(init: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    if init {
        let path = Config::default().save()?;
        if output_mode != OutputMode::Quiet {
            println!(
                "{} {}",
                Theme::success("Wrote default config to"),
                path.display()
            );
        }
        return Ok(());
    }

    let config = Config::load();
    if output_mode == OutputMode::Quiet {
        return Ok(());
    }

    match Config::config_path() {
        Ok(path) => {
            let state = if path.exists() { "" } else { " (not created, using defaults)" };
            println!(
                "{} {}{}",
                Theme::primary("Config file:"),
                path.display(),
                Theme::muted(state)
            );
        }
        Err(e) => println!("{} {}", Theme::warning("Config file unavailable:"), e),
    }
    println!();
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
