//! Symbol search over the local index, with a framework-reference fallback

use std::fmt::Write as _;
use std::sync::Arc;

use appledocs_core::scoring::RankFilter;
use appledocs_core::{FrameworkIndex, Technology};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{McpError, McpResult};
use crate::tools::ToolContext;

/// Largest result cap a caller may request
pub const MAX_RESULTS_LIMIT: usize = 100;

/// Parameters for search_symbols
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Search query. Supports `*` and `?` wildcards.
    pub query: String,
    /// Maximum number of results (default from configuration, max 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    /// Only symbols available on this platform, e.g. "iOS".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Only symbols of this kind, e.g. "struct" or "protocol".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_type: Option<String>,
}

/// Where results came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchSource {
    /// Local index over the disk cache
    LocalIndex,
    /// Active framework's reference table
    FrameworkIndex,
}

/// One search hit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Symbol title
    pub title: String,
    /// Documentation path
    pub path: String,
    /// Kind
    pub kind: String,
    /// Plain-text description
    pub description: String,
    /// Platforms
    pub platforms: Vec<String>,
    /// Relevance
    pub score: u32,
}

/// Output from search_symbols
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput {
    /// Query as given
    pub query: String,
    /// Active technology title
    pub technology: String,
    /// Result source
    pub source: SearchSource,
    /// Ranked hits
    pub hits: Vec<SearchHit>,
}

impl SearchOutput {
    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# Search results for \"{}\" in {}\n", self.query, self.technology);
        let source = match self.source {
            SearchSource::LocalIndex => "local index",
            SearchSource::FrameworkIndex => "framework references",
        };
        if self.hits.is_empty() {
            let _ = write!(
                out,
                "\nNo symbols found ({source}). Try a wildcard such as \"{}*\".",
                self.query.trim_end_matches('*')
            );
            return out;
        }
        let _ = writeln!(out, "\n{} results from {source}\n", self.hits.len());
        for hit in &self.hits {
            let _ = write!(out, "- **{}** ({}) `{}`", hit.title, hit.kind, hit.path);
            if !hit.platforms.is_empty() {
                let _ = write!(out, " [{}]", hit.platforms.join(", "));
            }
            if !hit.description.is_empty() {
                let _ = write!(out, ": {}", hit.description);
            }
            out.push('\n');
        }
        out.push_str("\nUse get_documentation with a path for details.");
        out
    }
}

async fn framework_index(ctx: &ToolContext, technology: &Technology) -> McpResult<Arc<FrameworkIndex>> {
    if let Some(index) = ctx.session.framework_index().await {
        return Ok(index);
    }
    let data = ctx.client.get_framework(&technology.path_name()).await?;
    let fallback = Arc::new(FrameworkIndex::build(&data));
    ctx.session.set_framework_data(&technology.identifier, data).await;
    Ok(ctx.session.framework_index().await.unwrap_or(fallback))
}

/// Handle search_symbols
#[tracing::instrument(skip(ctx))]
pub async fn handle_search(ctx: &ToolContext, params: SearchParams) -> McpResult<SearchOutput> {
    let technology = ctx
        .session
        .active_technology()
        .await
        .ok_or(McpError::NoTechnology)?;
    let limit = params
        .max_results
        .unwrap_or(ctx.config.search.default_max_results)
        .clamp(1, MAX_RESULTS_LIMIT);
    let filter = RankFilter {
        symbol_type: params.symbol_type.clone().filter(|s| !s.trim().is_empty()),
        platform: params.platform.clone().filter(|s| !s.trim().is_empty()),
    };

    let index = ctx
        .session
        .get_or_create_local_index()
        .await
        .ok_or(McpError::NoTechnology)?;
    if let Err(e) = index.build_index_from_cache().await {
        warn!(error = %e, "local index build failed, using framework references");
    }

    let indexed = index.symbol_count().await;
    let (source, hits) = if indexed >= ctx.config.search.min_symbol_count {
        let hits = index
            .search(&params.query, usize::MAX)
            .await
            .into_iter()
            .filter(|hit| filter.accepts(&hit.entry))
            .take(limit)
            .map(|hit| SearchHit {
                title: hit.entry.title,
                path: hit.entry.path,
                kind: hit.entry.kind,
                description: hit.entry.abstract_text,
                platforms: hit.entry.platforms,
                score: hit.score,
            })
            .collect();
        (SearchSource::LocalIndex, hits)
    } else {
        debug!(
            indexed,
            min = ctx.config.search.min_symbol_count,
            "local index sparse, searching framework references"
        );
        let framework = framework_index(ctx, &technology).await?;
        let hits = framework
            .search(&params.query, &filter, limit)
            .into_iter()
            .map(|ranked| SearchHit {
                title: ranked.entry.title.clone(),
                path: ranked.entry.path.clone(),
                kind: ranked.entry.kind.clone(),
                description: ranked.entry.description.clone(),
                platforms: ranked.entry.platforms.clone(),
                score: ranked.score,
            })
            .collect();
        (SearchSource::FrameworkIndex, hits)
    };

    Ok(SearchOutput {
        query: params.query,
        technology: technology.title,
        source,
        hits,
    })
}
