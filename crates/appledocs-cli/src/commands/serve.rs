//! MCP server command

use anyhow::Result;
use appledocs_core::Config;

/// Run the MCP server over stdio until the client disconnects.
///
/// Tracing is already installed by `main`, so this goes through
/// [`appledocs_mcp::serve_stdio`] which does not initialize it again.
pub async fn execute(config: Config) -> Result<()> {
    appledocs_mcp::serve_stdio(config).await?;
    Ok(())
}
