//! Fetch and render one documentation page

use anyhow::Result;
use appledocs_core::{Config, DocsClient};
use appledocs_mcp::render::render_symbol;

use crate::output::{OutputFormat, print_json};

/// Fetch `path` through the disk cache and print it.
pub async fn execute(config: &Config, path: &str, format: OutputFormat) -> Result<()> {
    let client = DocsClient::new(config)?;
    let symbol = client.get_symbol(path).await?;
    match format {
        OutputFormat::Json => print_json(&symbol)?,
        OutputFormat::Text => println!("{}", render_symbol(&symbol)),
    }
    Ok(())
}
