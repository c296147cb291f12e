//! Logging initialization and configuration.
//!
//! Logs always go to stderr: stdout carries MCP frames when serving and
//! command output otherwise.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::Cli;
use crate::output::OutputFormat;

/// Base log level from the global flags and the selected output format.
///
/// JSON output keeps stderr quiet unless `--verbose` was given.
pub fn level_for(cli: &Cli) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || cli.format() == Some(OutputFormat::Json) {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the flag-derived level.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = level_for(cli);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var("NO_COLOR").ok().is_some();
    if cli.no_color || env_no_color || cli.format() == Some(OutputFormat::Json) {
        color_control::set_override(false);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn level(args: &[&str]) -> Level {
        level_for(&Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_levels_follow_flags() {
        assert_eq!(level(&["appledocs"]), Level::WARN);
        assert_eq!(level(&["appledocs", "-v"]), Level::DEBUG);
        assert_eq!(level(&["appledocs", "-q", "cache", "clear"]), Level::ERROR);
    }

    #[test]
    fn test_json_output_silences_logs() {
        assert_eq!(
            level(&["appledocs", "search", "view", "--format", "json"]),
            Level::ERROR
        );
        assert_eq!(
            level(&["appledocs", "-v", "search", "view", "--format", "json"]),
            Level::DEBUG
        );
    }
}
