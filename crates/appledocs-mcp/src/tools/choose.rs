//! Technology selection with fuzzy name matching

use appledocs_core::{Technology, TechnologyMap};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};
use crate::tools::ToolContext;

const MAX_SUGGESTIONS: usize = 5;

/// Parameters for choose_technology
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChooseParams {
    /// Framework name, e.g. "SwiftUI". Matched loosely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exact technology identifier from discover_technologies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// Output from choose_technology
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooseOutput {
    /// Selected framework title
    pub title: String,
    /// Selected framework identifier
    pub identifier: String,
    /// Whether the selection changed the active technology
    pub changed: bool,
    /// Number of symbol references in the framework, when it could be loaded
    pub symbol_count: Option<usize>,
}

impl ChooseOutput {
    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        let mut out = if self.changed {
            format!("Selected **{}** (`{}`).", self.title, self.identifier)
        } else {
            format!("**{}** is already the active technology.", self.title)
        };
        match self.symbol_count {
            Some(count) => out.push_str(&format!("\n\n{count} symbols available. Use search_symbols to explore.")),
            None => out.push_str("\n\nFramework data could not be loaded yet; it will be retried on the next search."),
        }
        out
    }
}

/// Lower-case and keep only alphanumerics: "Core Data" -> "coredata".
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolve a technology by identifier, exact title, normalized title, or fuzzy title.
///
/// Non-framework entries take part in matching so the caller can be told why
/// they were rejected.
pub fn resolve<'a>(
    technologies: &'a TechnologyMap,
    name: Option<&str>,
    identifier: Option<&str>,
) -> Option<&'a Technology> {
    if let Some(id) = identifier.map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(tech) = technologies.get(id) {
            return Some(tech);
        }
        if let Some(tech) = technologies.values().find(|t| t.identifier == id) {
            return Some(tech);
        }
    }

    let name = name.map(str::trim).filter(|s| !s.is_empty())?;
    if let Some(tech) = technologies
        .values()
        .find(|t| t.title.eq_ignore_ascii_case(name))
    {
        return Some(tech);
    }

    let wanted = normalize(name);
    if let Some(tech) = technologies
        .values()
        .filter(|t| t.is_framework())
        .find(|t| normalize(&t.title) == wanted || t.path_name() == wanted)
    {
        return Some(tech);
    }

    let matcher = SkimMatcherV2::default();
    technologies
        .values()
        .filter(|t| t.is_framework())
        .filter_map(|t| matcher.fuzzy_match(&t.title, name).map(|score| (score, t)))
        .max_by(|(a, ta), (b, tb)| a.cmp(b).then_with(|| tb.title.len().cmp(&ta.title.len())))
        .map(|(_, t)| t)
}

fn suggestions(candidates: &[Technology], name: &str) -> Vec<String> {
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, &Technology)> = candidates
        .iter()
        .filter_map(|t| {
            let first = name.chars().next()?;
            let loose = t.title.to_lowercase().starts_with(first.to_ascii_lowercase());
            matcher
                .fuzzy_match(&t.title, name)
                .or_else(|| loose.then_some(0))
                .map(|s| (s, t))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.title.cmp(&b.1.title)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, t)| t.title.clone())
        .collect()
}

/// Handle choose_technology
#[tracing::instrument(skip(ctx))]
pub async fn handle_choose(ctx: &ToolContext, params: ChooseParams) -> McpResult<ChooseOutput> {
    if params.name.as_deref().is_none_or(|s| s.trim().is_empty())
        && params.identifier.as_deref().is_none_or(|s| s.trim().is_empty())
    {
        return Err(McpError::InvalidParams(
            "provide either name or identifier".into(),
        ));
    }

    let technologies = ctx.client.get_technologies().await?;
    let Some(tech) = resolve(&technologies, params.name.as_deref(), params.identifier.as_deref())
    else {
        let wanted = params
            .name
            .or(params.identifier)
            .unwrap_or_default();
        let pool: Vec<Technology> = match ctx.session.last_discovery().await {
            Some(snapshot) if !snapshot.technologies.is_empty() => snapshot.technologies,
            _ => technologies.into_values().filter(Technology::is_framework).collect(),
        };
        let hints = suggestions(&pool, &wanted);
        let message = if hints.is_empty() {
            format!("no technology matches '{wanted}'. Use discover_technologies to list frameworks")
        } else {
            format!("no technology matches '{wanted}'. Did you mean: {}?", hints.join(", "))
        };
        return Err(McpError::InvalidParams(message));
    };

    if !tech.is_framework() {
        return Err(McpError::InvalidParams(format!(
            "'{}' is a {} ({}), not a framework; only framework collections can be selected",
            tech.title, tech.kind, tech.role
        )));
    }
    let tech = tech.clone();

    let changed = ctx.session.set_active_technology(tech.clone()).await;
    let symbol_count = match ctx.session.framework_data().await {
        Some(data) if !changed => Some(data.references.values().filter(|r| r.is_symbol()).count()),
        _ => match ctx.client.get_framework(&tech.path_name()).await {
            Ok(data) => {
                let count = data.references.values().filter(|r| r.is_symbol()).count();
                ctx.session.set_framework_data(&tech.identifier, data).await;
                Some(count)
            },
            Err(e) => {
                tracing::warn!(technology = %tech.title, error = %e, "failed to load framework data");
                None
            },
        },
    };

    Ok(ChooseOutput {
        title: tech.title,
        identifier: tech.identifier,
        changed,
        symbol_count,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map() -> TechnologyMap {
        let entries = [
            ("SwiftUI", "symbol", "collection"),
            ("UIKit", "symbol", "collection"),
            ("Core Data", "symbol", "collection"),
            ("App Store Review Guidelines", "article", "article"),
        ];
        entries
            .iter()
            .map(|(title, kind, role)| {
                let slug = normalize(title);
                let id = format!("doc://com.apple.documentation/documentation/{slug}");
                let tech: Technology = serde_json::from_value(json!({
                    "identifier": id,
                    "title": title,
                    "url": format!("/documentation/{slug}"),
                    "kind": kind,
                    "role": role
                }))
                .unwrap();
                (id, tech)
            })
            .collect()
    }

    #[test]
    fn test_resolution_order() {
        let technologies = map();
        let by_id = resolve(
            &technologies,
            Some("UIKit"),
            Some("doc://com.apple.documentation/documentation/swiftui"),
        )
        .unwrap();
        assert_eq!(by_id.title, "SwiftUI");

        assert_eq!(resolve(&technologies, Some("uikit"), None).unwrap().title, "UIKit");
        assert_eq!(resolve(&technologies, Some("core-data"), None).unwrap().title, "Core Data");
        assert_eq!(resolve(&technologies, Some("swftui"), None).unwrap().title, "SwiftUI");
        assert!(resolve(&technologies, Some("zzzz"), None).is_none());
        assert!(resolve(&technologies, None, None).is_none());
    }

    #[test]
    fn test_non_framework_still_resolves_for_rejection() {
        let technologies = map();
        let tech = resolve(&technologies, Some("App Store Review Guidelines"), None).unwrap();
        assert!(!tech.is_framework());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Core Data"), "coredata");
        assert_eq!(normalize("  Swift-UI "), "swiftui");
    }
}
