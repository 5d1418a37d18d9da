//! Command implementations

mod config;
mod detect;
mod inspect;
mod train;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Train(args) => train::execute(args, &config, &output),
        Commands::Detect(args) => detect::execute(args, &config, &output),
        Commands::Inspect(args) => inspect::execute(args, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
