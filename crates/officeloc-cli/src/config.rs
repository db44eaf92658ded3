//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use officeloc_core::config::{CliConfigOverrides, LayeredConfig, CONFIG_FILE_NAME};

use crate::cli::Cli;

/// Defaults < `officeloc.toml` in the working directory < environment < flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults()
        .load_from_optional_file(CONFIG_FILE_NAME)
        .context("Failed to load configuration file")?
        .load_from_env();

    config.update_from_cli(CliConfigOverrides {
        default_srid: cli.default_srid,
        database_url: cli.database_url.clone(),
    });

    Ok(config)
}
