//! Command implementations

mod config;
mod db;
mod distance;
mod office;
mod resolve;

use crate::cli::{Cli, Commands};
use crate::config::load_config;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Office(args) => {
            let storage = Storage::new(cli.storage, &config, &cli.data_dir).await?;
            office::execute(args, &storage, &output).await
        }
        Commands::Resolve(args) => {
            let storage = Storage::new(cli.storage, &config, &cli.data_dir).await?;
            resolve::execute(args, &storage, &output).await
        }
        Commands::Distance(args) => distance::execute(args, &output),
        Commands::Db(args) => db::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}
