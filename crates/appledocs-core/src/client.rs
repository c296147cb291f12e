//! Read-through documentation client.
//!
//! Combines the HTTP [`Fetcher`] with the on-disk [`DiskCache`]: a disk hit
//! short-circuits the network, a miss fetches and then writes back on a
//! best-effort basis.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fetcher::{Fetcher, HttpBackend};
use crate::storage::{DiskCache, parse_technologies};
use crate::types::{FrameworkData, SymbolData, TechnologyMap};
use crate::{Error, Result};

const TECHNOLOGIES_PATH: &str = "documentation/technologies";

/// Filters for [`DocsClient::search_framework`].
#[derive(Debug, Clone, Default)]
pub struct FrameworkSearchOptions {
    /// Result cap; `None` means unbounded.
    pub max_results: Option<usize>,
    /// Keep only references whose kind matches, case-insensitively.
    pub symbol_type: Option<String>,
    /// Keep only references available on a platform containing this text.
    pub platform: Option<String>,
}

/// One reference matched by [`DocsClient::search_framework`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkSearchHit {
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
}

/// Where a document was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Already on disk.
    Disk,
    /// Fetched upstream and written to disk.
    Network,
}

/// Documentation client over the transport and the disk cache.
#[derive(Debug)]
pub struct DocsClient {
    fetcher: Fetcher,
    disk: DiskCache,
}

impl DocsClient {
    /// Client with the production HTTP backend.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&config.http, &config.cache)?,
            disk: DiskCache::new(config.cache.dir.clone()),
        })
    }

    /// Client over a custom backend.
    pub fn with_backend(config: &Config, backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            fetcher: Fetcher::with_backend(backend, &config.http, &config.cache),
            disk: DiskCache::new(config.cache.dir.clone()),
        }
    }

    /// The disk cache this client reads through.
    pub const fn disk(&self) -> &DiskCache {
        &self.disk
    }

    /// The underlying transport.
    pub const fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Framework landing page by name (`SwiftUI`, `uikit`, ...).
    pub async fn get_framework(&self, name: &str) -> Result<FrameworkData> {
        if let Some(cached) = self.disk.load_framework(name) {
            debug!(framework = name, "framework disk cache hit");
            return Ok(cached);
        }
        self.refresh_framework(name).await
    }

    /// Fetch a framework from the network, bypassing the disk cache.
    pub async fn refresh_framework(&self, name: &str) -> Result<FrameworkData> {
        let path = framework_path(name);
        let data: FrameworkData = self.fetcher.get_documentation(&path).await?;
        info!(framework = name, references = data.references.len(), "fetched framework");
        if let Err(e) = self.disk.save_framework(name, &data) {
            warn!(framework = name, error = %e, "failed to cache framework");
        }
        Ok(data)
    }

    /// Symbol page by documentation path (`/documentation/swiftui/view`).
    pub async fn get_symbol(&self, path: &str) -> Result<SymbolData> {
        self.get_symbol_with_origin(path).await.map(|(data, _)| data)
    }

    /// Like [`get_symbol`](Self::get_symbol), also reporting whether the disk
    /// cache already had the page.
    pub async fn get_symbol_with_origin(&self, path: &str) -> Result<(SymbolData, Origin)> {
        let path = normalize_path(path);
        if let Some(cached) = self.disk.load_symbol(&path) {
            debug!(%path, "symbol disk cache hit");
            return Ok((cached, Origin::Disk));
        }
        let data: SymbolData = self.fetcher.get_documentation(&path).await?;
        if let Err(e) = self.disk.save_symbol(&path, &data) {
            warn!(%path, error = %e, "failed to cache symbol");
        }
        Ok((data, Origin::Network))
    }

    /// Technology list keyed by identifier.
    pub async fn get_technologies(&self) -> Result<TechnologyMap> {
        if let Some(cached) = self.disk.load_technologies() {
            debug!(count = cached.len(), "technology list disk cache hit");
            return Ok(cached);
        }
        self.refresh_technologies().await
    }

    /// Fetch the technology list from the network, bypassing the disk cache.
    pub async fn refresh_technologies(&self) -> Result<TechnologyMap> {
        let value: Value = self
            .fetcher
            .request(&format!("{TECHNOLOGIES_PATH}.json"))
            .await?;
        let technologies = parse_technologies(&value);
        if technologies.is_empty() {
            return Err(Error::InvalidResponse(
                "technology list contained no usable entries".into(),
            ));
        }
        info!(count = technologies.len(), "fetched technology list");
        if let Err(e) = self.disk.save_technologies(&technologies) {
            warn!(error = %e, "failed to cache technology list");
        }
        Ok(technologies)
    }

    /// Linear substring search over one framework's symbol references.
    ///
    /// Results keep reference-table order; there is no ranking.
    pub async fn search_framework(
        &self,
        name: &str,
        query: &str,
        options: &FrameworkSearchOptions,
    ) -> Result<Vec<FrameworkSearchHit>> {
        let framework = self.get_framework(name).await?;
        Ok(search_references(&framework, query, options))
    }

    /// Drop the in-memory response cache. The disk cache is untouched.
    pub async fn clear_memory_cache(&self) {
        self.fetcher.clear_cache().await;
    }
}

/// Filter a framework's symbol references by substring and options.
pub fn search_references(
    framework: &FrameworkData,
    query: &str,
    options: &FrameworkSearchOptions,
) -> Vec<FrameworkSearchHit> {
    let needle = query.trim().to_lowercase();
    let symbol_type = options.symbol_type.as_deref().map(str::to_lowercase);
    let platform = options.platform.as_deref().map(str::to_lowercase);
    let limit = options.max_results.unwrap_or(usize::MAX);

    framework
        .references
        .values()
        .filter(|r| r.is_symbol())
        .filter(|r| {
            needle.is_empty()
                || r.title.to_lowercase().contains(&needle)
                || r.abstract_text().to_lowercase().contains(&needle)
        })
        .filter(|r| {
            symbol_type
                .as_deref()
                .is_none_or(|t| r.display_kind().to_lowercase() == t)
        })
        .filter(|r| {
            platform.as_deref().is_none_or(|p| {
                r.platform_names()
                    .iter()
                    .any(|name| name.to_lowercase().contains(p))
            })
        })
        .take(limit)
        .map(|r| FrameworkSearchHit {
            title: r.title.clone(),
            path: r.url.clone().unwrap_or_default(),
            kind: r.display_kind(),
            description: r.abstract_text(),
            platforms: r.platform_names(),
        })
        .collect()
}

/// `documentation/<lower-cased name>` for a framework name or path.
pub fn framework_path(name: &str) -> String {
    let trimmed = name.trim().trim_matches('/');
    let name = trimmed.strip_prefix("documentation/").unwrap_or(trimmed);
    format!("documentation/{}", name.to_lowercase())
}

/// Normalise a symbol path to `/documentation/...` form.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".json").unwrap_or(trimmed);
    let trimmed = trimmed.trim_start_matches('/');
    if trimmed.starts_with("documentation/") {
        format!("/{trimmed}")
    } else {
        format!("/documentation/{trimmed}")
    }
}
