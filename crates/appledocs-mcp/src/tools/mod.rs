//! MCP tools for Apple documentation

use std::sync::Arc;

use appledocs_core::{Config, DocsClient, SessionState};

pub mod choose;
pub mod current;
pub mod discover;
pub mod documentation;
pub mod search;
pub mod stats;

pub use choose::{ChooseOutput, ChooseParams, handle_choose};
pub use current::{CurrentOutput, handle_current};
pub use discover::{DiscoverOutput, DiscoverParams, handle_discover};
pub use documentation::{DocOutput, DocParams, handle_documentation};
pub use search::{SearchOutput, SearchParams, SearchSource, handle_search};
pub use stats::{CacheStatsOutput, VersionOutput, handle_cache_stats};

/// Shared state every handler reads
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Documentation client
    pub client: Arc<DocsClient>,
    /// Session state for this connection
    pub session: Arc<SessionState>,
    /// Effective configuration
    pub config: Arc<Config>,
}

impl ToolContext {
    /// Context over an existing client
    pub fn new(config: Config, client: DocsClient) -> Self {
        let session = SessionState::new(config.cache.dir.clone(), config.search.clone());
        Self {
            client: Arc::new(client),
            session: Arc::new(session),
            config: Arc::new(config),
        }
    }

    /// Context with the production HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: Config) -> appledocs_core::Result<Self> {
        let client = DocsClient::new(&config)?;
        Ok(Self::new(config, client))
    }
}
