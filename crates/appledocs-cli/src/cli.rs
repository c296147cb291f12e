//! # CLI Structure and Argument Parsing
//!
//! `appledocs` runs the MCP server by default and offers a few subcommands for
//! working with the documentation cache directly:
//!
//! ```bash
//! # MCP server over stdio (default)
//! appledocs
//! appledocs serve
//!
//! # Search cached symbols
//! appledocs search "Grid*" --technology swiftui
//!
//! # Render one symbol page
//! appledocs doc /documentation/swiftui/view
//!
//! # Cache maintenance
//! appledocs cache stats
//! appledocs cache clear
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Main CLI structure for the `appledocs` command
#[derive(Parser, Clone, Debug)]
#[command(name = "appledocs")]
#[command(version)]
#[command(about = "appledocs - Apple developer documentation cache, search and MCP server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show debug logs
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE", env = "APPLEDOCS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory override
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Run the MCP server over stdio
    Serve,

    /// Search symbols in the local documentation cache
    Search {
        /// Search query; `*` and `?` are wildcards
        query: String,

        /// Restrict to one technology (name, path segment or identifier)
        #[arg(short, long)]
        technology: Option<String>,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Fetch and render the documentation page for a symbol path
    Doc {
        /// Documentation path, e.g. /documentation/swiftui/view
        path: String,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Inspect or clear the documentation cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Stats {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Delete every cached document
    Clear,
}

impl Cli {
    /// Output format of the selected command, if it has one
    pub fn format(&self) -> Option<OutputFormat> {
        match &self.command {
            Some(
                Commands::Search { format, .. }
                | Commands::Doc { format, .. }
                | Commands::Cache {
                    command: CacheCommands::Stats { format },
                },
            ) => Some(*format),
            _ => None,
        }
    }
}
