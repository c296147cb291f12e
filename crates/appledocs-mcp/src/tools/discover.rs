//! Technology discovery with keyword filtering and pagination

use std::fmt::Write as _;

use appledocs_core::{DiscoverySnapshot, Technology};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};
use crate::tools::ToolContext;

/// Default page size
pub const DEFAULT_PAGE_SIZE: usize = 25;
/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: usize = 100;

/// Parameters for discover_technologies
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverParams {
    /// Keyword matched against framework titles and descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// 1-based page number (default: 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    /// Results per page (default: 25, max: 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

/// One discovered framework
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredTechnology {
    /// Display title
    pub title: String,
    /// Identifier to pass to choose_technology
    pub identifier: String,
    /// Plain-text description
    pub description: String,
}

/// Output from discover_technologies
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverOutput {
    /// Frameworks on this page
    pub technologies: Vec<DiscoveredTechnology>,
    /// Current page, 1-based
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Total number of matching frameworks
    pub total: usize,
    /// Keyword filter, if any
    pub query: Option<String>,
}

impl DiscoverOutput {
    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        match &self.query {
            Some(q) => {
                let _ = writeln!(out, "# Technologies matching \"{q}\"");
            },
            None => {
                let _ = writeln!(out, "# Technologies");
            },
        }
        if self.total == 0 {
            out.push_str("\nNo frameworks matched. Try a broader keyword.");
            return out;
        }
        let _ = writeln!(
            out,
            "\nPage {} of {} ({} frameworks)\n",
            self.page, self.total_pages, self.total
        );
        for tech in &self.technologies {
            if tech.description.is_empty() {
                let _ = writeln!(out, "- **{}** `{}`", tech.title, tech.identifier);
            } else {
                let _ = writeln!(
                    out,
                    "- **{}** `{}`: {}",
                    tech.title, tech.identifier, tech.description
                );
            }
        }
        if self.page < self.total_pages {
            let _ = write!(out, "\nUse page {} to see more.", self.page + 1);
        }
        out.trim_end().to_string()
    }
}

fn matches_keyword(tech: &Technology, keyword: &str) -> bool {
    tech.title.to_lowercase().contains(keyword)
        || tech.abstract_text().to_lowercase().contains(keyword)
}

/// Handle discover_technologies
#[tracing::instrument(skip(ctx))]
pub async fn handle_discover(ctx: &ToolContext, params: DiscoverParams) -> McpResult<DiscoverOutput> {
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(McpError::InvalidParams(format!(
            "pageSize must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(McpError::InvalidParams("page is 1-based".into()));
    }
    let query = params
        .query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    let technologies = ctx.client.get_technologies().await?;
    let keyword = query.as_deref().map(str::to_lowercase);
    let mut matching: Vec<Technology> = technologies
        .into_values()
        .filter(Technology::is_framework)
        .filter(|t| keyword.as_deref().is_none_or(|k| matches_keyword(t, k)))
        .collect();
    matching.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));

    let total = matching.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let technologies = matching
        .iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .map(|t| DiscoveredTechnology {
            title: t.title.clone(),
            identifier: t.identifier.clone(),
            description: t.abstract_text(),
        })
        .collect();

    ctx.session
        .set_last_discovery(DiscoverySnapshot::new(query.clone(), matching))
        .await;

    Ok(DiscoverOutput {
        technologies,
        page,
        total_pages,
        total,
        query,
    })
}
