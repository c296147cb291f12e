//! appledocs CLI
//!
//! Runs the MCP server by default; subcommands work with the documentation
//! cache directly.

use anyhow::Result;
use appledocs_core::Config;
use clap::Parser;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{CacheCommands, Cli, Commands};
use utils::logging::initialize_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = load_config(&cli)?;
    execute_command(cli, config).await
}

/// Layered configuration with `--cache-dir` applied last.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.cache_dir {
        config.cache.dir.clone_from(dir);
    }
    tracing::debug!(cache_dir = %config.cache.dir.display(), base_url = %config.http.base_url, "configuration loaded");
    Ok(config)
}

async fn execute_command(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        None | Some(Commands::Serve) => commands::serve(config).await,
        Some(Commands::Search {
            query,
            technology,
            limit,
            format,
        }) => commands::search(&config, &query, technology.as_deref(), limit, format).await,
        Some(Commands::Doc { path, format }) => commands::show_doc(&config, &path, format).await,
        Some(Commands::Cache { command }) => match command {
            CacheCommands::Stats { format } => commands::cache_stats(&config, format),
            CacheCommands::Clear => commands::clear_cache(&config),
        },
    }
}
