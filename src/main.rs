use anyhow::Result;
use clap::Parser;
use replorer::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
