//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geoscope_core::config::{parse_grid_sizes, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "geoscope.toml";

/// Collect the configuration flags given on the command line
pub fn cli_overrides(cli: &Cli) -> Result<CliConfigOverrides> {
    let grid_sizes = cli
        .grid_sizes
        .as_deref()
        .map(parse_grid_sizes)
        .transpose()
        .context("Invalid --grid-sizes")?;

    Ok(CliConfigOverrides {
        grid_sizes,
        fine_grid_size: cli.fine_grid_size,
        cache_upper: cli.cache_upper,
        cache_lower: cli.cache_lower,
        max_ngram: cli.max_ngram,
    })
}

/// Resolve the configuration file: an explicit path must exist, the default one is optional
fn config_file(cli: &Cli) -> Option<PathBuf> {
    match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            default.exists().then(|| default.to_path_buf())
        }
    }
}

/// Load layered configuration: defaults, file, environment, then CLI flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(cli) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli_overrides(cli)?);
    Ok(config)
}
