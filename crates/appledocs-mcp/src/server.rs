//! MCP server for Apple documentation

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use appledocs_core::Config;

use crate::error::{McpError, McpResult};
use crate::tools::{self, ToolContext};

const INSTRUCTIONS: &str = "Browse Apple developer documentation. Start with discover_technologies, \
select a framework with choose_technology, then use search_symbols and get_documentation.";

fn respond(result: McpResult<String>) -> CallToolResult {
    match result {
        Ok(markdown) => CallToolResult::success(vec![Content::text(markdown)]),
        Err(e) => e.into_tool_result(),
    }
}

/// MCP server over a shared tool context
#[derive(Clone)]
pub struct McpServer {
    ctx: ToolContext,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("ctx", &self.ctx).finish_non_exhaustive()
    }
}

impl McpServer {
    /// Server with the production HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: Config) -> McpResult<Self> {
        Ok(Self::with_context(ToolContext::from_config(config)?))
    }

    /// Server over an existing context
    pub fn with_context(ctx: ToolContext) -> Self {
        Self {
            ctx,
            tool_router: Self::tool_router(),
        }
    }

    /// Shared tool context
    pub const fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Serve the MCP protocol over stdio
    pub async fn serve_stdio(&self) -> McpResult<()> {
        tracing::info!(cache_dir = %self.ctx.config.cache.dir.display(), "appledocs MCP server starting");

        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();

        let service = rmcp::serve_server(self.clone(), (stdin, stdout))
            .await
            .map_err(|e| {
                tracing::error!("server initialization error: {}", e);
                McpError::Protocol(e.to_string())
            })?;

        service.waiting().await.map_err(|e| {
            tracing::error!("server runtime error: {}", e);
            McpError::Protocol(e.to_string())
        })?;

        tracing::info!("appledocs MCP server stopped");
        Ok(())
    }
}

#[tool_router(router = tool_router)]
impl McpServer {
    /// List selectable frameworks.
    #[tool(
        name = "discover_technologies",
        description = "List Apple frameworks, optionally filtered by keyword, with pagination."
    )]
    pub async fn discover_technologies(
        &self,
        params: Parameters<tools::DiscoverParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(respond(
            tools::handle_discover(&self.ctx, params.0)
                .await
                .map(|out| out.to_markdown()),
        ))
    }

    /// Select the active framework.
    #[tool(
        name = "choose_technology",
        description = "Select the framework that search_symbols works within. Accepts a name (fuzzy-matched) or an identifier."
    )]
    pub async fn choose_technology(
        &self,
        params: Parameters<tools::ChooseParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(respond(
            tools::handle_choose(&self.ctx, params.0)
                .await
                .map(|out| out.to_markdown()),
        ))
    }

    /// Report the active framework.
    #[tool(
        name = "current_technology",
        description = "Report the currently selected framework."
    )]
    pub async fn current_technology(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(respond(Ok(tools::handle_current(&self.ctx).await.to_markdown())))
    }

    /// Ranked symbol search in the active framework.
    #[tool(
        name = "search_symbols",
        description = "Search symbols in the selected framework. Supports * and ? wildcards and platform or kind filters."
    )]
    pub async fn search_symbols(
        &self,
        params: Parameters<tools::SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(respond(
            tools::handle_search(&self.ctx, params.0)
                .await
                .map(|out| out.to_markdown()),
        ))
    }

    /// Render one documentation page.
    #[tool(
        name = "get_documentation",
        description = "Fetch the documentation page for a symbol path such as /documentation/swiftui/view, or a bare symbol name."
    )]
    pub async fn get_documentation(
        &self,
        params: Parameters<tools::DocParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(respond(
            tools::handle_documentation(&self.ctx, params.0)
                .await
                .map(|out| out.to_markdown()),
        ))
    }

    /// Cache and index statistics.
    #[tool(
        name = "get_cache_stats",
        description = "Report cache sizes and local index state."
    )]
    pub async fn get_cache_stats(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(respond(Ok(tools::handle_cache_stats(&self.ctx).await.to_markdown())))
    }

    /// Server name and version.
    #[tool(name = "get_version", description = "Report the server version.")]
    pub async fn get_version(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(respond(Ok(tools::VersionOutput::current().to_markdown())))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "appledocs-mcp".to_string(),
                title: Some("Apple documentation".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use appledocs_core::{DocsClient, HttpBackend};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Offline;

    #[async_trait]
    impl HttpBackend for Offline {
        async fn get_json(&self, url: &str) -> appledocs_core::Result<Value> {
            Err(appledocs_core::Error::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    fn server(dir: &TempDir) -> McpServer {
        let mut config = Config::default();
        config.cache.dir = dir.path().to_path_buf();
        let client = DocsClient::with_backend(&config, Arc::new(Offline));
        McpServer::with_context(ToolContext::new(config, client))
    }

    #[test]
    fn test_server_info() {
        let dir = TempDir::new().unwrap();
        let info = server(&dir).get_info();
        assert_eq!(info.server_info.name, "appledocs-mcp");
        assert!(!info.server_info.version.is_empty());
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_handshake_is_small() {
        let dir = TempDir::new().unwrap();
        let json = serde_json::to_string(&server(&dir).get_info()).unwrap();
        assert!(json.len() < 1024, "handshake is {} bytes", json.len());
    }

    #[tokio::test]
    async fn test_search_without_selection_is_tool_error() {
        let dir = TempDir::new().unwrap();
        let server = server(&dir);
        let params = tools::SearchParams {
            query: "view".into(),
            max_results: None,
            platform: None,
            symbol_type: None,
        };
        let result = server.search_symbols(Parameters(params)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
