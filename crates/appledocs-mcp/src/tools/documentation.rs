//! Symbol documentation with short-path resolution and topic expansion

use std::fmt::Write as _;
use std::sync::Arc;

use appledocs_core::client::normalize_path;
use appledocs_core::{Error, Origin, SymbolData, Technology};
use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::{McpError, McpResult};
use crate::render::render_symbol;
use crate::tools::ToolContext;

/// Topic references fetched alongside a symbol
pub const MAX_EXPANDED_REFERENCES: usize = 5;

/// Frameworks from the last discovery tried for a bare symbol name
pub const MAX_DISCOVERED_CANDIDATES: usize = 5;

/// Frameworks tried for bare symbol names after the active and discovered ones
pub const COMMON_FRAMEWORKS: &[&str] = &["swiftui", "uikit", "appkit", "foundation", "swift"];

/// Parameters for get_documentation
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocParams {
    /// Documentation path ("/documentation/swiftui/view", "swiftui/view")
    /// or a bare symbol name ("View").
    pub path: String,
}

/// A topic reference fetched with the main symbol
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedSymbol {
    /// Title
    pub title: String,
    /// Documentation path
    pub path: String,
    /// Plain-text abstract
    pub description: String,
}

/// Output from get_documentation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocOutput {
    /// Resolved documentation path
    pub path: String,
    /// Rendered page
    pub markdown: String,
    /// Expanded topic references
    pub related: Vec<RelatedSymbol>,
}

impl DocOutput {
    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        let mut out = self.markdown.clone();
        if !self.related.is_empty() {
            out.push_str("\n\n## Related\n");
            for rel in &self.related {
                let _ = write!(out, "\n- **{}** `{}`", rel.title, rel.path);
                if !rel.description.is_empty() {
                    let _ = write!(out, ": {}", rel.description);
                }
            }
        }
        out
    }
}

/// Direct documentation path for inputs that carry one.
///
/// `doc://` identifiers and anything containing `/` are paths; bare names are not.
pub fn direct_path(input: &str) -> Option<String> {
    let input = input.trim();
    if let Some(rest) = input.strip_prefix("doc://") {
        let slash = rest.find('/')?;
        return Some(normalize_path(&rest[slash..].to_lowercase()));
    }
    input
        .trim_matches('/')
        .contains('/')
        .then(|| normalize_path(&input.to_lowercase()))
}

/// Candidate paths for a bare symbol name, in resolution order.
///
/// The active framework comes first, then at most
/// [`MAX_DISCOVERED_CANDIDATES`] discovered ones, then [`COMMON_FRAMEWORKS`].
pub fn candidate_paths(name: &str, active: Option<&str>, discovered: &[String]) -> Vec<String> {
    let symbol = name.trim().to_lowercase();
    let mut seen = Vec::new();
    for framework in active
        .into_iter()
        .chain(discovered.iter().take(MAX_DISCOVERED_CANDIDATES).map(String::as_str))
        .chain(COMMON_FRAMEWORKS.iter().copied())
    {
        let path = format!("/documentation/{}/{symbol}", framework.to_lowercase());
        if !seen.contains(&path) {
            seen.push(path);
        }
    }
    seen
}

async fn resolve_bare(
    ctx: &ToolContext,
    name: &str,
    permits: &Arc<Semaphore>,
) -> McpResult<(String, SymbolData, Origin)> {
    let active = ctx.session.active_technology().await.map(|t| t.path_name());
    let discovered: Vec<String> = ctx
        .session
        .last_discovery()
        .await
        .map(|snapshot| snapshot.technologies.iter().map(Technology::path_name).collect())
        .unwrap_or_default();
    let candidates = candidate_paths(name, active.as_deref(), &discovered);

    let attempts = candidates.iter().map(|path| {
        let permits = Arc::clone(permits);
        async move {
            let _permit = permits.acquire().await.ok()?;
            match ctx.client.get_symbol_with_origin(path).await {
                Ok(found) => Some(found),
                Err(e) => {
                    debug!(%path, error = %e, "candidate failed");
                    None
                },
            }
        }
    });
    let results = join_all(attempts).await;

    candidates
        .iter()
        .zip(results)
        .find_map(|(path, found)| found.map(|(data, origin)| (path.clone(), data, origin)))
        .ok_or_else(|| {
            McpError::Core(Error::NotFound(format!(
                "symbol '{name}' not found; tried {}",
                candidates.join(", ")
            )))
        })
}

/// Fetch unexpanded topic references; also reports whether any came from upstream.
async fn expand_topics(
    ctx: &ToolContext,
    symbol: &SymbolData,
    permits: &Arc<Semaphore>,
) -> (Vec<RelatedSymbol>, bool) {
    let mut pending = Vec::new();
    for identifier in symbol.topic_identifiers() {
        if pending.len() == MAX_EXPANDED_REFERENCES {
            break;
        }
        if ctx.session.is_expanded(&identifier).await {
            continue;
        }
        let Some(url) = symbol.references.get(&identifier).and_then(|r| r.url.clone()) else {
            continue;
        };
        if url.starts_with("/documentation/") {
            pending.push((identifier, url));
        }
    }

    let fetches = pending.into_iter().map(|(identifier, url)| {
        let permits = Arc::clone(permits);
        async move {
            let _permit = permits.acquire().await.ok()?;
            match ctx.client.get_symbol_with_origin(&url).await {
                Ok((data, origin)) => Some((identifier, url, data, origin)),
                Err(e) => {
                    warn!(%url, error = %e, "failed to expand topic reference");
                    None
                },
            }
        }
    });

    let fetched: Vec<_> = join_all(fetches).await.into_iter().flatten().collect();
    ctx.session
        .mark_expanded(fetched.iter().map(|(id, _, _, _)| id.clone()))
        .await;
    let downloaded = fetched
        .iter()
        .any(|(_, _, _, origin)| *origin == Origin::Network);
    let related = fetched
        .into_iter()
        .map(|(identifier, url, data, _)| RelatedSymbol {
            title: if data.metadata.title.is_empty() {
                symbol
                    .references
                    .get(&identifier)
                    .map_or_else(|| url.clone(), |r| r.title.clone())
            } else {
                data.metadata.title.clone()
            },
            path: url,
            description: data.abstract_text(),
        })
        .collect();
    (related, downloaded)
}

/// Handle get_documentation
#[tracing::instrument(skip(ctx))]
pub async fn handle_documentation(ctx: &ToolContext, params: DocParams) -> McpResult<DocOutput> {
    if params.path.trim().is_empty() {
        return Err(McpError::InvalidParams("path must not be empty".into()));
    }
    let permits = Arc::new(Semaphore::new(
        ctx.config.http.max_concurrent_requests.max(1),
    ));

    let (path, symbol, origin) = match direct_path(&params.path) {
        Some(path) => {
            let (data, origin) = ctx.client.get_symbol_with_origin(&path).await?;
            (path, data, origin)
        },
        None => resolve_bare(ctx, &params.path, &permits).await?,
    };

    let (related, downloaded) = expand_topics(ctx, &symbol, &permits).await;
    if origin == Origin::Network || downloaded {
        // New cache files: rebuild on the next search.
        if let Some(index) = ctx.session.local_index().await {
            index.clear().await;
        }
    }

    Ok(DocOutput {
        markdown: render_symbol(&symbol),
        path,
        related,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_direct_path_forms() {
        assert_eq!(
            direct_path("/documentation/SwiftUI/View").as_deref(),
            Some("/documentation/swiftui/view")
        );
        assert_eq!(
            direct_path("swiftui/view").as_deref(),
            Some("/documentation/swiftui/view")
        );
        assert_eq!(
            direct_path("doc://com.apple.SwiftUI/documentation/SwiftUI/Text").as_deref(),
            Some("/documentation/swiftui/text")
        );
        assert_eq!(direct_path("View"), None);
        assert_eq!(direct_path("/View/"), None);
    }

    #[test]
    fn test_candidates_prefer_active_and_dedupe() {
        let candidates = candidate_paths("View", Some("uikit"), &["uikit".to_string(), "metal".to_string()]);
        assert_eq!(candidates[0], "/documentation/uikit/view");
        assert_eq!(candidates[1], "/documentation/metal/view");
        assert_eq!(candidates[2], "/documentation/swiftui/view");
        assert_eq!(
            candidates.iter().filter(|c| c.contains("/uikit/")).count(),
            1
        );
        assert_eq!(candidates.len(), 2 + COMMON_FRAMEWORKS.len() - 1);
    }

    #[test]
    fn test_discovered_candidates_are_capped() {
        let discovered: Vec<String> = (0..200).map(|i| format!("framework{i}")).collect();
        let candidates = candidate_paths("View", Some("metal"), &discovered);

        assert_eq!(
            candidates.len(),
            1 + MAX_DISCOVERED_CANDIDATES + COMMON_FRAMEWORKS.len()
        );
        assert_eq!(candidates[0], "/documentation/metal/view");
        assert_eq!(candidates[MAX_DISCOVERED_CANDIDATES], "/documentation/framework4/view");
        assert!(!candidates.iter().any(|c| c.contains("framework5")));
    }
}
