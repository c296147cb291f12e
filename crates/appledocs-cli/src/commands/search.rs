//! Offline symbol search over the disk cache

use anyhow::Result;
use appledocs_core::{Config, LocalSymbolIndex};

use crate::output::{OutputFormat, format_hit, print_json};

/// Path-segment filter for a technology given by name, path or identifier.
///
/// `SwiftUI`, `/documentation/swiftui` and
/// `doc://com.apple.documentation/documentation/swiftui` all yield `swiftui`.
pub fn technology_filter(technology: &str) -> String {
    technology
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Build the local index and print ranked hits.
pub async fn execute(
    config: &Config,
    query: &str,
    technology: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let index = LocalSymbolIndex::new(
        config.cache.dir.clone(),
        technology.map(technology_filter),
        &config.search,
    );
    let summary = index.build_index_from_cache().await?;
    tracing::debug!(?summary, "index built");

    let limit = limit.unwrap_or(config.search.default_max_results);
    let hits = index.search(query, limit).await;

    match format {
        OutputFormat::Json => print_json(&hits)?,
        OutputFormat::Text => {
            if hits.is_empty() {
                println!(
                    "No symbols matched \"{query}\" across {} indexed entries.",
                    summary.entries
                );
                if summary.entries == 0 {
                    println!("The cache at {} is empty; fetch pages with `appledocs doc` or the MCP server first.", config.cache.dir.display());
                }
                return Ok(());
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!("{}", format_hit(rank + 1, hit));
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technology_filter_forms() {
        assert_eq!(technology_filter("SwiftUI"), "swiftui");
        assert_eq!(technology_filter("/documentation/swiftui/"), "swiftui");
        assert_eq!(
            technology_filter("doc://com.apple.documentation/documentation/SwiftUI"),
            "swiftui"
        );
    }
}
