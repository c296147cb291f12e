//! End-to-end tests for building the local symbol index from a cache directory.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use appledocs_core::{DiskCache, IndexStatus, LocalSymbolIndex, SearchConfig, SymbolData};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn symbol(title: &str, kind: &str, path: &str, abstract_text: &str) -> Value {
    json!({
        "abstract": [{"type": "text", "text": abstract_text}],
        "metadata": {"title": title, "symbolKind": kind, "role": "symbol"},
        "primaryContentSections": [],
        "identifier": {
            "url": format!("doc://com.apple.documentation{path}"),
            "interfaceLanguage": "swift"
        }
    })
}

fn titles(hits: &[appledocs_core::ScoredEntry]) -> Vec<&str> {
    hits.iter().map(|h| h.entry.title.as_str()).collect()
}

#[tokio::test]
async fn view_and_button_scenario() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "view.json",
        &symbol("View", "protocol", "/documentation/swiftui/view", "A piece of your app's user interface."),
    );
    write(
        tmp.path(),
        "button.json",
        &symbol("Button", "struct", "/documentation/swiftui/button", "A control that initiates an action."),
    );

    let index = LocalSymbolIndex::new(tmp.path(), None, &SearchConfig::default());
    let summary = index.build_index_from_cache().await.unwrap();
    assert_eq!(summary.documents_indexed, 2);
    assert_eq!(index.status().await, IndexStatus::Ready);

    let hits = index.search("but", 10).await;
    assert_eq!(titles(&hits), vec!["Button"]);
    assert!(hits[0].score > 0);
    assert_eq!(hits[0].entry.kind, "struct");

    assert!(index.search("nonexistent123", 10).await.is_empty());
}

#[tokio::test]
async fn wildcard_queries() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "griditem.json",
        &symbol("GridItem", "struct", "/documentation/swiftui/griditem", "A description of a row or column."),
    );
    write(
        tmp.path(),
        "view.json",
        &symbol("View", "protocol", "/documentation/swiftui/view", "A piece of UI."),
    );
    write(
        tmp.path(),
        "button.json",
        &symbol("Button", "struct", "/documentation/swiftui/button", "A control."),
    );

    let index = LocalSymbolIndex::new(tmp.path(), None, &SearchConfig::default());
    index.build_index_from_cache().await.unwrap();

    let grid = index.search("Grid*", 10).await;
    assert_eq!(titles(&grid), vec!["GridItem"]);
    assert_eq!(grid[0].score, appledocs_core::local_index::WILDCARD_SCORE);

    let view = index.search("Vie?", 10).await;
    assert_eq!(titles(&view), vec!["View"]);

    let by_path = index.search("/documentation/swiftui/b*", 10).await;
    assert_eq!(titles(&by_path), vec!["Button"]);
}

#[tokio::test]
async fn entries_matching_more_terms_rank_higher() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "button.json",
        &symbol("Button", "struct", "/documentation/swiftui/button", "A control that initiates an action."),
    );
    write(
        tmp.path(),
        "view.json",
        &symbol("View", "protocol", "/documentation/swiftui/view", "A piece of UI."),
    );
    write(
        tmp.path(),
        "navigationview.json",
        &symbol(
            "NavigationView",
            "struct",
            "/documentation/swiftui/navigationview",
            "A view for presenting a stack of views.",
        ),
    );

    let index = LocalSymbolIndex::new(tmp.path(), None, &SearchConfig::default());
    index.build_index_from_cache().await.unwrap();

    let hits = index.search("nav view", 10).await;
    assert_eq!(titles(&hits), vec!["NavigationView", "View"]);
    assert!(hits[0].score > hits[1].score);
}

#[tokio::test]
async fn technology_filter_applies_to_documents_and_references() {
    let tmp = TempDir::new().unwrap();
    let cache = DiskCache::new(tmp.path());

    let swiftui_view: SymbolData = serde_json::from_value(json!({
        "metadata": {"title": "View", "symbolKind": "protocol"},
        "primaryContentSections": [],
        "url": "/documentation/swiftui/view",
        "references": {
            "doc://swiftui/text": {"title": "Text", "kind": "symbol", "url": "/documentation/swiftui/text"},
            "doc://uikit/uiview": {"title": "UIView", "kind": "symbol", "url": "/documentation/uikit/uiview"}
        }
    }))
    .unwrap();
    let uikit_button: SymbolData = serde_json::from_value(json!({
        "metadata": {"title": "UIButton", "symbolKind": "class"},
        "primaryContentSections": [],
        "url": "/documentation/uikit/uibutton"
    }))
    .unwrap();
    cache.save_symbol("/documentation/swiftui/view", &swiftui_view).unwrap();
    cache.save_symbol("/documentation/uikit/uibutton", &uikit_button).unwrap();
    write(
        tmp.path(),
        "uikit.json",
        &json!({
            "metadata": {"title": "UIKit", "role": "collection"},
            "identifier": {"url": "doc://com.apple.documentation/documentation/UIKit"},
            "references": {
                "doc://uikit/uiwindow": {"title": "UIWindow", "kind": "symbol", "url": "/documentation/uikit/uiwindow"}
            },
            "topicSections": []
        }),
    );

    let index = LocalSymbolIndex::new(
        tmp.path(),
        Some("swiftui".to_string()),
        &SearchConfig::default(),
    );
    let summary = index.build_index_from_cache().await.unwrap();
    assert_eq!(summary.documents_indexed, 3);

    let all = index.search("", 50).await;
    let mut found = titles(&all);
    found.sort_unstable();
    assert_eq!(found, vec!["Text", "View"]);
    assert!(all.iter().all(|h| h.entry.path.contains("swiftui")));

    let unfiltered = LocalSymbolIndex::new(tmp.path(), None, &SearchConfig::default());
    unfiltered.build_index_from_cache().await.unwrap();
    assert_eq!(unfiltered.symbol_count().await, 6);
}

#[tokio::test]
async fn nonexistent_directory_is_tolerated() {
    let tmp = TempDir::new().unwrap();
    let index = LocalSymbolIndex::new(
        tmp.path().join("does-not-exist"),
        None,
        &SearchConfig::default(),
    );

    index.build_index_from_cache().await.unwrap();

    assert_eq!(index.symbol_count().await, 0);
    assert_eq!(index.status().await, IndexStatus::Ready);
}
