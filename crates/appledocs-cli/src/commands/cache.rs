//! Cache maintenance commands

use anyhow::Result;
use appledocs_core::{Config, DiskCache};
use colored::Colorize;
use serde_json::json;

use crate::output::{OutputFormat, print_json};

/// Print disk cache statistics.
pub fn stats(config: &Config, format: OutputFormat) -> Result<()> {
    let disk = DiskCache::new(config.cache.dir.clone());
    let stats = disk.stats();
    match format {
        OutputFormat::Json => print_json(&json!({
            "cacheDir": disk.cache_dir(),
            "stats": stats,
        }))?,
        OutputFormat::Text => {
            println!("{} {}", "Cache:".bold(), disk.cache_dir().display());
            println!("  Framework documents: {}", stats.framework_files);
            println!("  Symbol documents:    {}", stats.symbol_files);
            println!(
                "  Technology list:     {}",
                if stats.has_technologies { "cached" } else { "not cached" }
            );
            println!("  Total bytes:         {}", stats.total_bytes);
        },
    }
    Ok(())
}

/// Delete every cached document.
pub fn clear(config: &Config) -> Result<()> {
    let disk = DiskCache::new(config.cache.dir.clone());
    let removed = disk.clear()?;
    println!(
        "{} {removed} cached documents from {}",
        "Removed".green(),
        disk.cache_dir().display()
    );
    Ok(())
}
