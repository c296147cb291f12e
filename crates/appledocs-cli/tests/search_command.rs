#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::tempdir;

mod common;
use common::{appledocs_cmd, symbol_page};

fn seed(dir: &std::path::Path) -> anyhow::Result<()> {
    let cache = dir.join("cache");
    std::fs::create_dir_all(&cache)?;
    let pages = [
        ("view.json", symbol_page("View", "protocol", "/documentation/swiftui/view")),
        ("griditem.json", symbol_page("GridItem", "struct", "/documentation/swiftui/griditem")),
        ("button.json", symbol_page("UIButton", "class", "/documentation/uikit/uibutton")),
    ];
    for (name, page) in pages {
        std::fs::write(cache.join(name), serde_json::to_string(&page)?)?;
    }
    Ok(())
}

#[test]
fn wildcard_search_in_text() -> anyhow::Result<()> {
    let dir = tempdir()?;
    seed(dir.path())?;
    appledocs_cmd(dir.path())
        .args(["search", "Grid*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GridItem"))
        .stdout(predicate::str::contains("/documentation/swiftui/griditem"))
        .stdout(predicate::str::contains("UIButton").not());
    Ok(())
}

#[test]
fn technology_filter_in_json() -> anyhow::Result<()> {
    let dir = tempdir()?;
    seed(dir.path())?;
    let output = appledocs_cmd(dir.path())
        .args(["search", "*", "--technology", "UIKit", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let hits: serde_json::Value = serde_json::from_slice(&output)?;
    let titles: Vec<_> = hits
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["entry"]["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["UIButton".to_string()]);
    Ok(())
}

#[test]
fn empty_cache_reports_no_matches() -> anyhow::Result<()> {
    let dir = tempdir()?;
    appledocs_cmd(dir.path())
        .args(["search", "View"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No symbols matched"));
    Ok(())
}
