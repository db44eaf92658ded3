//! officeloc CLI - Command-line interface
//!
//! Manage office polygons and resolve coordinates against them.

mod cli;
mod commands;
mod config;
mod output;
mod output_types;
mod storage;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { commands::execute(cli).await })?;

    Ok(())
}
