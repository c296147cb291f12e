//! Error types for the appledocs MCP server with MCP error code mapping

use rmcp::model::{CallToolResult, Content};
use thiserror::Error;

/// JSON-RPC invalid request.
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC invalid params.
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC internal error.
pub const INTERNAL_ERROR: i32 = -32603;

/// Errors that can occur in the MCP server
#[derive(Debug, Error)]
pub enum McpError {
    /// Core library operation failed
    #[error("{0}")]
    Core(#[from] appledocs_core::Error),

    /// Invalid parameter provided, or a selection that cannot be honoured
    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    /// A tool that needs an active technology was called without one
    #[error("no technology selected: call choose_technology first")]
    NoTechnology,

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl McpError {
    /// Map error to MCP error code
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Core(
                appledocs_core::Error::NotFound(_) | appledocs_core::Error::InvalidRequest(_),
            )
            | Self::InvalidParams(_)
            | Self::NoTechnology => INVALID_PARAMS,
            Self::Protocol(_) => INVALID_REQUEST,
            Self::Core(_) => INTERNAL_ERROR,
        }
    }

    /// Render as a tool-level error result, so the client sees the message
    /// instead of a transport failure.
    pub fn into_tool_result(self) -> CallToolResult {
        let code = self.error_code();
        tracing::warn!(code, error = %self, "tool call failed");
        CallToolResult::error(vec![Content::text(format!("Error ({code}): {self}"))])
    }
}

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;
