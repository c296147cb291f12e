//! Cache statistics and version reporting

use std::fmt::Write as _;
use std::path::PathBuf;

use appledocs_core::{DiskStats, IndexStatus};
use serde::Serialize;

use crate::tools::ToolContext;

/// Local index state for the active technology
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Build status
    pub status: IndexStatus,
    /// Indexed entries
    pub entries: usize,
}

/// Output from get_cache_stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsOutput {
    /// Cache directory
    pub cache_dir: PathBuf,
    /// On-disk document counts
    pub disk: DiskStats,
    /// Live entries in the response cache
    pub memory_entries: usize,
    /// Response cache capacity
    pub memory_capacity: usize,
    /// Active technology title
    pub active_technology: Option<String>,
    /// Local index, once created
    pub local_index: Option<IndexStats>,
    /// Topic references already expanded
    pub expanded_references: usize,
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

impl CacheStatsOutput {
    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Cache statistics\n\n");
        let _ = writeln!(out, "- Directory: `{}`", self.cache_dir.display());
        let _ = writeln!(out, "- Framework documents: {}", self.disk.framework_files);
        let _ = writeln!(out, "- Symbol documents: {}", self.disk.symbol_files);
        let _ = writeln!(
            out,
            "- Technology list: {}",
            if self.disk.has_technologies { "cached" } else { "not cached" }
        );
        let _ = writeln!(out, "- Disk usage: {}", human_bytes(self.disk.total_bytes));
        let _ = writeln!(
            out,
            "- Response cache: {}/{} entries",
            self.memory_entries, self.memory_capacity
        );
        match &self.active_technology {
            Some(title) => {
                let _ = writeln!(out, "- Active technology: {title}");
            },
            None => out.push_str("- Active technology: none\n"),
        }
        if let Some(index) = &self.local_index {
            let _ = writeln!(out, "- Local index: {:?}, {} entries", index.status, index.entries);
        }
        let _ = write!(out, "- Expanded references: {}", self.expanded_references);
        out
    }
}

/// Handle get_cache_stats
pub async fn handle_cache_stats(ctx: &ToolContext) -> CacheStatsOutput {
    let disk = ctx.client.disk();
    let local_index = match ctx.session.local_index().await {
        Some(index) => Some(IndexStats {
            status: index.status().await,
            entries: index.symbol_count().await,
        }),
        None => None,
    };
    CacheStatsOutput {
        cache_dir: disk.cache_dir().to_path_buf(),
        disk: disk.stats(),
        memory_entries: ctx.client.fetcher().cache_len().await,
        memory_capacity: ctx.config.cache.max_entries,
        active_technology: ctx.session.active_technology().await.map(|t| t.title),
        local_index,
        expanded_references: ctx.session.expanded_count().await,
    }
}

/// Output from get_version
#[derive(Debug, Clone, Serialize)]
pub struct VersionOutput {
    /// Package name
    pub name: &'static str,
    /// Package version
    pub version: &'static str,
}

impl VersionOutput {
    /// Version of this build
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}
