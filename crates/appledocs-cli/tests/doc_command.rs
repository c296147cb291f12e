#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{appledocs_cmd, symbol_page};

#[tokio::test]
async fn doc_fetches_renders_and_caches() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documentation/swiftui/view.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(symbol_page("View", "protocol", "/documentation/swiftui/view")),
        )
        .expect(1)
        .mount(&server)
        .await;

    appledocs_cmd(dir.path())
        .env("APPLEDOCS_BASE_URL", server.uri())
        .args(["doc", "/documentation/swiftui/view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# View"))
        .stdout(predicate::str::contains("The View protocol."));

    // Second run is served from the disk cache.
    appledocs_cmd(dir.path())
        .env("APPLEDOCS_BASE_URL", server.uri())
        .args(["doc", "swiftui/view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# View"));
    Ok(())
}

#[tokio::test]
async fn doc_reports_missing_pages() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let server = MockServer::start().await;

    appledocs_cmd(dir.path())
        .env("APPLEDOCS_BASE_URL", server.uri())
        .args(["doc", "/documentation/swiftui/nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
    Ok(())
}
