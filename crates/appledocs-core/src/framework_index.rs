//! Token table over one framework's symbol references, used when the local
//! symbol index is too sparse to answer a query.

use serde::Serialize;

use crate::scoring::{Candidate, RankFilter, Ranked, rank};
use crate::tokenize::tokenize_preserving_case;
use crate::types::FrameworkData;

/// One symbol reference with its case-preserving tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkIndexEntry {
    /// Key in the framework's reference table.
    pub id: String,
    /// Reference title.
    pub title: String,
    /// Documentation path.
    pub path: String,
    /// Kind or role.
    pub kind: String,
    /// Plain-text abstract.
    pub description: String,
    /// Platform names.
    pub platforms: Vec<String>,
    /// Tokens from the title and the last path segment.
    #[serde(skip)]
    pub tokens: Vec<String>,
}

impl Candidate for FrameworkIndexEntry {
    fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn platforms(&self) -> &[String] {
        &self.platforms
    }
}

/// Framework reference index.
#[derive(Debug, Clone, Default)]
pub struct FrameworkIndex {
    entries: Vec<FrameworkIndexEntry>,
}

impl FrameworkIndex {
    /// Index every symbol reference of `framework`.
    pub fn build(framework: &FrameworkData) -> Self {
        let entries = framework
            .references
            .iter()
            .filter(|(_, r)| r.is_symbol())
            .map(|(id, r)| {
                let path = r.url.clone().unwrap_or_default();
                let mut tokens = tokenize_preserving_case(&r.title);
                if let Some(segment) = path.rsplit('/').next() {
                    for token in tokenize_preserving_case(segment) {
                        if !tokens.contains(&token) {
                            tokens.push(token);
                        }
                    }
                }
                FrameworkIndexEntry {
                    id: id.clone(),
                    title: r.title.clone(),
                    path,
                    kind: r.display_kind(),
                    description: r.abstract_text(),
                    platforms: r.platform_names(),
                    tokens,
                }
            })
            .collect();
        Self { entries }
    }

    /// Ranked matches for `query`.
    pub fn search(&self, query: &str, filter: &RankFilter, limit: usize) -> Vec<Ranked<'_, FrameworkIndexEntry>> {
        rank(&self.entries, query, filter, limit)
    }

    /// Number of indexed references.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in reference-table order.
    pub fn entries(&self) -> &[FrameworkIndexEntry] {
        &self.entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn framework() -> FrameworkData {
        serde_json::from_value(json!({
            "metadata": {"title": "SwiftUI"},
            "references": {
                "a": {"title": "NavigationStack", "kind": "symbol", "role": "symbol", "url": "/documentation/swiftui/navigationstack"},
                "b": {"title": "NavigationView", "kind": "symbol", "role": "symbol", "url": "/documentation/swiftui/navigationview", "platforms": [{"name": "iOS"}]},
                "c": {"title": "View", "kind": "symbol", "role": "symbol", "url": "/documentation/swiftui/view"},
                "d": {"title": "Views and controls", "kind": "article", "url": "/documentation/swiftui/views"},
                "e": {"type": "image"}
            },
            "topicSections": []
        }))
        .unwrap()
    }

    #[test]
    fn test_build_skips_non_symbols() {
        let index = FrameworkIndex::build(&framework());
        assert_eq!(index.len(), 3);
        assert!(index.entries()[1].tokens.contains(&"View".to_string()));
        assert!(index.entries()[1].tokens.contains(&"navigationview".to_string()));
    }

    #[test]
    fn test_search_ranks_best_match_first() {
        let index = FrameworkIndex::build(&framework());
        let hits = index.search("NavigationView", &RankFilter::default(), 10);
        assert_eq!(hits[0].entry.title, "NavigationView");

        let hits = index.search("View", &RankFilter::default(), 10);
        let titles: Vec<&str> = hits.iter().map(|h| h.entry.title.as_str()).collect();
        assert_eq!(titles, vec!["NavigationView", "View"]);
    }
}
