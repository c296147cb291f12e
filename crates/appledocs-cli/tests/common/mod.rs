#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// `appledocs` command isolated to `dir` for both config and cache.
#[allow(dead_code)]
pub fn appledocs_cmd(dir: &Path) -> Command {
    let config = dir.join("config.toml");
    if !config.exists() {
        std::fs::write(&config, "").expect("failed to write empty config");
    }
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("appledocs"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("APPLEDOCS_CONFIG", &config);
    cmd.env("APPLEDOCS_CACHE_DIR", dir.join("cache"));
    cmd.env("APPLEDOCS_MAX_RETRIES", "1");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
}

#[allow(dead_code)]
pub fn symbol_page(title: &str, kind: &str, path: &str) -> serde_json::Value {
    serde_json::json!({
        "abstract": [{"type": "text", "text": format!("The {title} {kind}.")}],
        "metadata": {"title": title, "symbolKind": kind, "platforms": [{"name": "iOS", "introducedAt": "13.0"}]},
        "primaryContentSections": [],
        "identifier": {"url": format!("doc://com.apple.SwiftUI{path}"), "interfaceLanguage": "swift"}
    })
}
