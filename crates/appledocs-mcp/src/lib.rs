//! Apple documentation MCP server
//!
//! Exposes technology discovery, framework selection, symbol search and
//! documentation rendering as MCP tools over stdio. Each server holds one
//! [`appledocs_core::SessionState`], so `choose_technology` scopes every later
//! search.

pub mod error;
pub mod render;
pub mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use server::McpServer;
pub use tools::ToolContext;

/// Run the MCP server over stdio until the client disconnects.
///
/// Logging goes to stderr; the caller installs the subscriber.
///
/// # Errors
///
/// Returns an error if the server fails to initialize or run.
pub async fn serve_stdio(config: appledocs_core::Config) -> McpResult<()> {
    tracing::debug!("initializing appledocs MCP server");
    let server = McpServer::new(config)?;
    server.serve_stdio().await
}
