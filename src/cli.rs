use clap::{ArgAction, Parser, Subcommand};

mod commands;

use crate::output::OutputMode;

#[derive(Parser)]
#[command(name = "replorer")]
#[command(version)]
#[command(about = "Restart Windows Explorer and reopen the folders you had open")]
#[command(
    long_about = "Replorer force-restarts Windows Explorer and restores your open folder \
    windows afterwards. Virtual windows such as This PC or the Recycle Bin are not \
    restored; window position and view mode are not kept.\n\n\
    Examples:\n  \
    replorer                          # Restart Explorer and reopen folders\n  \
    replorer restart --dry-run        # Show what would happen\n  \
    replorer restart --wait-for-shell 10  # Wait for Explorer before reopening\n  \
    replorer list --json              # Print open folders as JSON"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Restart Explorer and reopen the open folder windows (default)
    #[command(visible_alias = "r")]
    Restart {
        /// Show what would be terminated and reopened without doing it
        #[arg(long)]
        dry_run: bool,

        /// Delay between reopened windows in milliseconds [default: 100]
        #[arg(long, value_name = "MS")]
        pacing_ms: Option<u64>,

        /// How long to wait for each Explorer process to exit [default: 2000]
        #[arg(long, value_name = "MS")]
        exit_wait_ms: Option<u64>,

        /// Wait up to SECS for Explorer to come back before reopening (0 = don't wait)
        #[arg(long, value_name = "SECS")]
        wait_for_shell: Option<u64>,

        /// Output the restart report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the folder windows that would be restored
    #[command(visible_alias = "l")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or initialize the configuration file
    Config {
        /// Write a config file with default values
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = OutputMode::from_flags(self.quiet, self.verbose);

        if let Err(e) = crate::logging::init_logging(output_mode) {
            eprintln!("Warning: {}", e);
        }

        match self.command {
            None => commands::restart_command::handle_restart(
                false,
                None,
                None,
                None,
                false,
                output_mode,
            ),
            Some(Commands::Restart {
                dry_run,
                pacing_ms,
                exit_wait_ms,
                wait_for_shell,
                json,
            }) => commands::restart_command::handle_restart(
                dry_run,
                pacing_ms,
                exit_wait_ms,
                wait_for_shell,
                json,
                output_mode,
            ),
            Some(Commands::List { json }) => commands::list_command::handle_list(json, output_mode),
            Some(Commands::Config { init }) => {
                commands::config_command::handle_config(init, output_mode)
            }
        }
    }
}
