//! # Output Formatting
//!
//! Commands print either human-readable text (colored on a terminal) or a
//! single pretty-printed JSON document for scripts:
//!
//! ```bash
//! appledocs search "Grid*" -t swiftui
//! appledocs search "Grid*" -t swiftui --format json | jq '.[].path'
//! ```

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use appledocs_core::ScoredEntry;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One search hit as a text block.
pub fn format_hit(rank: usize, hit: &ScoredEntry) -> String {
    let entry = &hit.entry;
    let mut block = format!(
        "{rank:>3}. {} {} {}",
        entry.title.bold(),
        format!("({})", entry.kind).dimmed(),
        format!("score {}", hit.score).bright_blue()
    );
    block.push_str(&format!("\n     {}", entry.path.cyan()));
    if !entry.platforms.is_empty() {
        block.push_str(&format!("  [{}]", entry.platforms.join(", ")));
    }
    if !entry.abstract_text.is_empty() {
        block.push_str(&format!("\n     {}", entry.abstract_text));
    }
    block
}
