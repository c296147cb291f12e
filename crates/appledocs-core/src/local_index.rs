//! Searchable symbol table built by scanning the disk cache.
//!
//! The index walks every cached JSON document, validates it as a symbol page or
//! a framework page, and flattens it into [`LocalSymbolIndexEntry`] rows: one for
//! the document and one per embedded symbol reference. Reads happen in bounded
//! batches, each file under its own timeout, and a bad file only bumps the error
//! counter.
//!
//! ## Status
//!
//! ```text
//! Uninitialized ──build──▶ Building ──▶ Ready
//!                              └──────▶ Failed   (directory enumeration error)
//! ```
//!
//! Building while `Building` or `Ready` is a no-op; [`LocalSymbolIndex::clear`]
//! returns to `Uninitialized`. A clear that lands mid-build starts a new
//! generation: the running build stops inserting and leaves the status alone.
//! Searches are allowed in any state and see whatever has been indexed so far.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::join_all;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::scoring::Candidate;
use crate::storage::TECHNOLOGIES_FILE;
use crate::tokenize::tokenize;
use crate::types::{CachedDocument, FrameworkData, ReferenceData, SymbolData};
use crate::{Error, Result};

/// Score for a wildcard pattern match.
pub const WILDCARD_SCORE: u32 = 100;
/// Score for a literal match when the wildcard pattern cannot be compiled.
pub const LITERAL_FALLBACK_SCORE: u32 = 25;
/// Per query token: title contains the token.
pub const TITLE_SCORE: u32 = 50;
/// Per query token: token is one of the entry's tokens.
pub const TOKEN_SCORE: u32 = 30;
/// Per query token: abstract contains the token.
pub const ABSTRACT_SCORE: u32 = 10;

/// Lifecycle of a [`LocalSymbolIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    /// Never built, or cleared.
    Uninitialized,
    /// A build is running.
    Building,
    /// Build finished; the table may be empty.
    Ready,
    /// The cache directory could not be enumerated.
    Failed,
}

/// One searchable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSymbolIndexEntry {
    /// Path when known, else `<file>#<title>`.
    pub id: String,
    /// Symbol title.
    pub title: String,
    /// Documentation path; may be empty.
    pub path: String,
    /// Symbol kind or role.
    pub kind: String,
    /// Plain-text abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Platform names.
    pub platforms: Vec<String>,
    /// Lower-cased tokens from the title and last path segment.
    pub tokens: Vec<String>,
    /// Cache file the entry was extracted from.
    pub file_path: String,
}

impl Candidate for LocalSymbolIndexEntry {
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

/// A search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredEntry {
    /// Matched entry.
    pub entry: LocalSymbolIndexEntry,
    /// Relevance; zero only for empty-query listings.
    pub score: u32,
}

/// Outcome of a build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    /// JSON files considered.
    pub files_seen: usize,
    /// Files that validated as a symbol or framework document.
    pub documents_indexed: usize,
    /// Files that timed out, failed to read, or failed validation.
    pub errors: usize,
    /// Entries in the table after the build.
    pub entries: usize,
}

#[derive(Debug)]
struct IndexState {
    status: IndexStatus,
    generation: u64,
    entries: Vec<LocalSymbolIndexEntry>,
    positions: HashMap<String, usize>,
}

impl IndexState {
    fn new() -> Self {
        Self {
            status: IndexStatus::Uninitialized,
            generation: 0,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn insert(&mut self, entry: LocalSymbolIndexEntry) {
        if let Some(&pos) = self.positions.get(&entry.id) {
            self.entries[pos] = entry;
        } else {
            self.positions.insert(entry.id.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }
}

/// Symbol index over one cache directory, optionally restricted to a technology.
#[derive(Debug)]
pub struct LocalSymbolIndex {
    cache_dir: PathBuf,
    technology: Option<String>,
    batch_size: usize,
    file_timeout: Duration,
    state: RwLock<IndexState>,
}

impl LocalSymbolIndex {
    /// Index over `cache_dir`.
    ///
    /// With a technology filter, only entries whose path belongs to it are kept.
    /// A filter without `/` (`swiftui`) matches any path segment ignoring case; a
    /// filter with `/` (`/documentation/swiftui`) matches as a substring.
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        technology: Option<String>,
        search: &SearchConfig,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            technology: technology.filter(|t| !t.trim().is_empty()),
            batch_size: search.index_batch_size.max(1),
            file_timeout: search.file_read_timeout(),
            state: RwLock::new(IndexState::new()),
        }
    }

    /// The technology filter, if any.
    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }

    /// Current status.
    pub async fn status(&self) -> IndexStatus {
        self.state.read().await.status
    }

    /// Number of indexed entries.
    pub async fn symbol_count(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Snapshot of every entry in insertion order.
    pub async fn entries(&self) -> Vec<LocalSymbolIndexEntry> {
        self.state.read().await.entries.clone()
    }

    /// Drop every entry and return to `Uninitialized`.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.reset();
        state.status = IndexStatus::Uninitialized;
        state.generation += 1;
    }

    /// Scan the cache directory and populate the table.
    ///
    /// Returns immediately when the index is already `Ready` or `Building`. A
    /// build overtaken by [`clear`](Self::clear) returns what it saw without
    /// touching the status or the table.
    #[tracing::instrument(skip(self), fields(dir = %self.cache_dir.display(), technology = ?self.technology))]
    pub async fn build_index_from_cache(&self) -> Result<BuildSummary> {
        let generation = {
            let mut state = self.state.write().await;
            if matches!(state.status, IndexStatus::Ready | IndexStatus::Building) {
                debug!(status = ?state.status, "index build skipped");
                return Ok(BuildSummary {
                    entries: state.entries.len(),
                    ..BuildSummary::default()
                });
            }
            state.reset();
            state.status = IndexStatus::Building;
            state.generation
        };

        let outcome = self.scan(generation).await;
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!("index cleared during build, discarding result");
            return outcome.map(|summary| BuildSummary {
                entries: state.entries.len(),
                ..summary
            });
        }

        match outcome {
            Ok(mut summary) => {
                state.status = IndexStatus::Ready;
                summary.entries = state.entries.len();
                info!(
                    files = summary.files_seen,
                    documents = summary.documents_indexed,
                    errors = summary.errors,
                    entries = summary.entries,
                    "local index ready"
                );
                Ok(summary)
            },
            Err(e) => {
                state.status = IndexStatus::Failed;
                warn!(error = %e, "local index build failed");
                Err(e)
            },
        }
    }

    async fn scan(&self, generation: u64) -> Result<BuildSummary> {
        let mut summary = BuildSummary::default();

        let reachable = tokio::fs::metadata(&self.cache_dir)
            .await
            .is_ok_and(|m| m.is_dir());
        if !reachable {
            debug!("cache directory missing, index is empty");
            return Ok(summary);
        }

        let files = self.list_documents().await?;
        summary.files_seen = files.len();

        for batch in files.chunks(self.batch_size) {
            let reads = batch.iter().map(|path| read_document(path, self.file_timeout));
            let results = join_all(reads).await;

            let mut extracted = Vec::new();
            for (path, result) in batch.iter().zip(results) {
                let file_path = path.display().to_string();
                let document = result.and_then(|value| {
                    CachedDocument::from_value(value).ok_or_else(|| {
                        Error::Parse("not a symbol or framework document".to_string())
                    })
                });
                match document {
                    Ok(doc) => {
                        summary.documents_indexed += 1;
                        extracted.extend(self.extract(&doc, &file_path));
                    },
                    Err(e) => {
                        summary.errors += 1;
                        warn!(file = %file_path, error = %e, "skipping cache file");
                    },
                }
            }

            let mut state = self.state.write().await;
            if state.generation != generation {
                break;
            }
            for entry in extracted {
                state.insert(entry);
            }
        }

        Ok(summary)
    }

    async fn list_documents(&self) -> Result<Vec<PathBuf>> {
        let mut dir = tokio::fs::read_dir(&self.cache_dir).await.map_err(|e| {
            Error::Index(format!(
                "cannot enumerate {}: {e}",
                self.cache_dir.display()
            ))
        })?;

        let mut files = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| Error::Index(format!("cannot enumerate {}: {e}", self.cache_dir.display())))?
        {
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let is_technologies = path
                .file_name()
                .is_some_and(|name| name == TECHNOLOGIES_FILE);
            if is_json && !is_technologies {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn extract(&self, document: &CachedDocument, file_path: &str) -> Vec<LocalSymbolIndexEntry> {
        let mut entries = Vec::new();
        match document {
            CachedDocument::Symbol(symbol) => {
                entries.push(symbol_entry(symbol, file_path));
                entries.extend(reference_entries(&symbol.references, file_path));
            },
            CachedDocument::Framework(framework) => {
                entries.push(framework_entry(framework, file_path));
                entries.extend(reference_entries(&framework.references, file_path));
            },
        }
        entries.retain(|e| self.belongs_to_technology(&e.path));
        entries
    }

    fn belongs_to_technology(&self, path: &str) -> bool {
        let Some(filter) = self.technology.as_deref() else {
            return true;
        };
        let filter = filter.trim().to_lowercase();
        let path = path.to_lowercase();
        if filter.contains('/') {
            path.contains(&filter)
        } else {
            path.split('/').any(|segment| segment == filter)
        }
    }

    /// Ranked search.
    ///
    /// `*` and `?` switch to anchored, case-insensitive pattern matching on title,
    /// path, or any token. Otherwise each query token adds points for a title hit,
    /// a token hit, and an abstract hit. An empty query lists entries in insertion
    /// order.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<ScoredEntry> {
        let state = self.state.read().await;
        let query = query.trim();

        if query.is_empty() {
            return state
                .entries
                .iter()
                .take(max_results)
                .map(|entry| ScoredEntry {
                    entry: entry.clone(),
                    score: 0,
                })
                .collect();
        }

        let mut scored: Vec<ScoredEntry> = if query.contains(['*', '?']) {
            wildcard_scores(&state.entries, query)
        } else {
            let tokens = tokenize(query);
            state
                .entries
                .iter()
                .filter_map(|entry| {
                    let score = token_score(entry, &tokens);
                    (score > 0).then(|| ScoredEntry {
                        entry: entry.clone(),
                        score,
                    })
                })
                .collect()
        };

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(max_results);
        scored
    }
}

/// Anchored, case-insensitive regex for a `*`/`?` pattern.
pub fn wildcard_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let mut source = String::from("(?i)^");
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source)
}

fn wildcard_scores(entries: &[LocalSymbolIndexEntry], pattern: &str) -> Vec<ScoredEntry> {
    match wildcard_regex(pattern) {
        Ok(re) => entries
            .iter()
            .filter(|e| {
                re.is_match(&e.title) || re.is_match(&e.path) || e.tokens.iter().any(|t| re.is_match(t))
            })
            .map(|e| ScoredEntry {
                entry: e.clone(),
                score: WILDCARD_SCORE,
            })
            .collect(),
        Err(err) => {
            debug!(pattern, error = %err, "wildcard pattern rejected, matching literally");
            let needle = pattern.to_lowercase();
            entries
                .iter()
                .filter(|e| {
                    e.title.to_lowercase().contains(&needle) || e.path.to_lowercase().contains(&needle)
                })
                .map(|e| ScoredEntry {
                    entry: e.clone(),
                    score: LITERAL_FALLBACK_SCORE,
                })
                .collect()
        },
    }
}

fn token_score(entry: &LocalSymbolIndexEntry, query_tokens: &[String]) -> u32 {
    let title = entry.title.to_lowercase();
    let abstract_text = entry.abstract_text.to_lowercase();
    query_tokens
        .iter()
        .map(|token| {
            let mut score = 0;
            if title.contains(token.as_str()) {
                score += TITLE_SCORE;
            }
            if entry.tokens.contains(token) {
                score += TOKEN_SCORE;
            }
            if abstract_text.contains(token.as_str()) {
                score += ABSTRACT_SCORE;
            }
            score
        })
        .sum()
}

async fn read_document(path: &Path, timeout: Duration) -> Result<Value> {
    let text = tokio::time::timeout(timeout, tokio::fs::read_to_string(path))
        .await
        .map_err(|_| Error::Timeout(format!("reading {} took longer than {timeout:?}", path.display())))??;
    serde_json::from_str(&text).map_err(|e| Error::Parse(format!("{}: {e}", path.display())))
}

fn entry_tokens(title: &str, path: &str) -> Vec<String> {
    let mut tokens = tokenize(title);
    if let Some(segment) = path.rsplit('/').next() {
        for token in tokenize(segment) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    tokens
}

fn entry_id(path: &str, file_path: &str, title: &str) -> String {
    if path.is_empty() {
        format!("{file_path}#{title}")
    } else {
        path.to_string()
    }
}

fn symbol_entry(symbol: &SymbolData, file_path: &str) -> LocalSymbolIndexEntry {
    let title = symbol.metadata.title.clone();
    let path = symbol.path().unwrap_or_default();
    LocalSymbolIndexEntry {
        id: entry_id(&path, file_path, &title),
        tokens: entry_tokens(&title, &path),
        kind: symbol.kind(),
        abstract_text: symbol.abstract_text(),
        platforms: symbol.metadata.platforms.iter().map(|p| p.name.clone()).collect(),
        file_path: file_path.to_string(),
        title,
        path,
    }
}

fn framework_entry(framework: &FrameworkData, file_path: &str) -> LocalSymbolIndexEntry {
    let title = framework.metadata.title.clone();
    let path = framework
        .identifier
        .as_ref()
        .and_then(crate::types::DocIdentifier::path)
        .unwrap_or_default();
    LocalSymbolIndexEntry {
        id: entry_id(&path, file_path, &title),
        tokens: entry_tokens(&title, &path),
        kind: framework
            .metadata
            .role
            .clone()
            .unwrap_or_else(|| "collection".to_string()),
        abstract_text: framework.abstract_text(),
        platforms: framework.metadata.platforms.iter().map(|p| p.name.clone()).collect(),
        file_path: file_path.to_string(),
        title,
        path,
    }
}

fn reference_entries<'a>(
    references: &'a BTreeMap<String, ReferenceData>,
    file_path: &'a str,
) -> impl Iterator<Item = LocalSymbolIndexEntry> + 'a {
    references
        .values()
        .filter(|r| r.is_symbol())
        .map(move |r| {
            let path = r.url.clone().unwrap_or_default();
            LocalSymbolIndexEntry {
                id: entry_id(&path, file_path, &r.title),
                tokens: entry_tokens(&r.title, &path),
                title: r.title.clone(),
                kind: r.display_kind(),
                abstract_text: r.abstract_text(),
                platforms: r.platform_names(),
                file_path: file_path.to_string(),
                path,
            }
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn config() -> SearchConfig {
        SearchConfig {
            index_batch_size: 2,
            ..SearchConfig::default()
        }
    }

    fn write(dir: &Path, name: &str, value: &Value) {
        std::fs::write(dir.join(name), value.to_string()).unwrap();
    }

    fn symbol_doc(title: &str, path: &str) -> Value {
        json!({
            "metadata": {"title": title, "symbolKind": "struct"},
            "primaryContentSections": [],
            "url": path
        })
    }

    #[test]
    fn test_wildcard_regex_is_anchored() {
        let re = wildcard_regex("Grid*").unwrap();
        assert!(re.is_match("GridItem"));
        assert!(re.is_match("grid"));
        assert!(!re.is_match("LazyVGrid"));

        let re = wildcard_regex("a.b?").unwrap();
        assert!(re.is_match("a.bc"));
        assert!(!re.is_match("axbc"));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "view_1.json", &symbol_doc("View", "/documentation/swiftui/view"));
        let index = LocalSymbolIndex::new(tmp.path(), None, &config());
        assert_eq!(index.status().await, IndexStatus::Uninitialized);

        let summary = index.build_index_from_cache().await.unwrap();
        assert_eq!(index.status().await, IndexStatus::Ready);
        assert_eq!(summary.entries, 1);

        write(tmp.path(), "text_2.json", &symbol_doc("Text", "/documentation/swiftui/text"));
        let again = index.build_index_from_cache().await.unwrap();
        assert_eq!(again.files_seen, 0);
        assert_eq!(index.symbol_count().await, 1);

        index.clear().await;
        assert_eq!(index.status().await, IndexStatus::Uninitialized);
        assert_eq!(index.symbol_count().await, 0);

        index.build_index_from_cache().await.unwrap();
        assert_eq!(index.symbol_count().await, 2);
    }

    #[tokio::test]
    async fn test_clear_during_build_is_not_undone() {
        let tmp = TempDir::new().unwrap();
        for i in 0..200 {
            write(
                tmp.path(),
                &format!("sym_{i:03}.json"),
                &symbol_doc(&format!("Symbol{i}"), &format!("/documentation/swiftui/symbol{i}")),
            );
        }
        let search = SearchConfig {
            index_batch_size: 1,
            ..SearchConfig::default()
        };
        let index = Arc::new(LocalSymbolIndex::new(tmp.path(), None, &search));

        let build = tokio::spawn({
            let index = Arc::clone(&index);
            async move { index.build_index_from_cache().await }
        });
        while index.status().await == IndexStatus::Uninitialized {
            tokio::task::yield_now().await;
        }
        index.clear().await;
        build.await.unwrap().unwrap();

        assert_eq!(index.status().await, IndexStatus::Uninitialized);
        assert_eq!(index.symbol_count().await, 0);

        let rebuilt = index.build_index_from_cache().await.unwrap();
        assert_eq!(rebuilt.files_seen, 200);
        assert_eq!(index.symbol_count().await, 200);
        assert_eq!(index.status().await, IndexStatus::Ready);
    }

    #[tokio::test]
    async fn test_stale_scan_stops_inserting() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", &symbol_doc("View", "/documentation/swiftui/view"));
        write(tmp.path(), "b.json", &symbol_doc("Text", "/documentation/swiftui/text"));
        let index = LocalSymbolIndex::new(tmp.path(), None, &config());

        let generation = index.state.read().await.generation;
        index.clear().await;
        index.scan(generation).await.unwrap();
        assert_eq!(index.symbol_count().await, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_timeout_counts_as_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", &symbol_doc("View", "/documentation/swiftui/view"));
        // A FIFO with no writer blocks the reader until the timeout fires.
        let fifo = tmp.path().join("stuck.json");
        let made = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
        assert!(made.success());

        let search = SearchConfig {
            file_read_timeout_ms: 50,
            ..SearchConfig::default()
        };
        let index = LocalSymbolIndex::new(tmp.path(), None, &search);
        let summary = index.build_index_from_cache().await.unwrap();

        assert_eq!(summary.files_seen, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.documents_indexed, 1);
        assert_eq!(index.status().await, IndexStatus::Ready);
        assert_eq!(index.symbol_count().await, 1);

        // Release the abandoned blocking read so the runtime can shut down.
        drop(std::fs::OpenOptions::new().write(true).open(&fifo).unwrap());
    }

    #[tokio::test]
    async fn test_missing_directory_is_ready_and_empty() {
        let tmp = TempDir::new().unwrap();
        let index = LocalSymbolIndex::new(tmp.path().join("nope"), None, &config());
        let summary = index.build_index_from_cache().await.unwrap();
        assert_eq!(summary, BuildSummary::default());
        assert_eq!(index.status().await, IndexStatus::Ready);
        assert!(index.search("view", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_files_are_counted_and_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "view_1.json", &symbol_doc("View", "/documentation/swiftui/view"));
        std::fs::write(tmp.path().join("broken.json"), "{ nope").unwrap();
        write(tmp.path(), "other.json", &json!({"hello": "world"}));
        write(tmp.path(), TECHNOLOGIES_FILE, &json!({"a": {"identifier": "a", "title": "A"}}));
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let index = LocalSymbolIndex::new(tmp.path(), None, &config());
        let summary = index.build_index_from_cache().await.unwrap();

        assert_eq!(summary.files_seen, 3);
        assert_eq!(summary.documents_indexed, 1);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.entries, 1);
    }

    #[tokio::test]
    async fn test_id_collisions_keep_position_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", &symbol_doc("View", "/documentation/swiftui/view"));
        write(tmp.path(), "b.json", &symbol_doc("Text", "/documentation/swiftui/text"));
        write(
            tmp.path(),
            "c.json",
            &json!({
                "metadata": {"title": "View (updated)", "symbolKind": "protocol"},
                "primaryContentSections": [],
                "url": "/documentation/swiftui/view"
            }),
        );
        write(tmp.path(), "d.json", &symbol_doc("Untitled", ""));

        let index = LocalSymbolIndex::new(tmp.path(), None, &config());
        index.build_index_from_cache().await.unwrap();
        let entries = index.entries().await;

        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["View (updated)", "Text", "Untitled"]);
        assert!(entries[2].id.ends_with("d.json#Untitled"));
    }

    #[tokio::test]
    async fn test_empty_query_lists_in_insertion_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", &symbol_doc("View", "/documentation/swiftui/view"));
        write(tmp.path(), "b.json", &symbol_doc("Text", "/documentation/swiftui/text"));
        write(tmp.path(), "c.json", &symbol_doc("Image", "/documentation/swiftui/image"));

        let index = LocalSymbolIndex::new(tmp.path(), None, &config());
        index.build_index_from_cache().await.unwrap();

        let hits = index.search("   ", 2).await;
        let titles: Vec<&str> = hits.iter().map(|h| h.entry.title.as_str()).collect();
        assert_eq!(titles, vec!["View", "Text"]);
        assert!(hits.iter().all(|h| h.score == 0));
    }

    #[tokio::test]
    async fn test_search_before_build_sees_nothing() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", &symbol_doc("View", "/documentation/swiftui/view"));
        let index = LocalSymbolIndex::new(tmp.path(), None, &config());
        assert!(index.search("view", 10).await.is_empty());
    }

    #[test]
    fn test_token_score_components() {
        let entry = LocalSymbolIndexEntry {
            id: "/documentation/swiftui/navigationview".into(),
            title: "NavigationView".into(),
            path: "/documentation/swiftui/navigationview".into(),
            kind: "struct".into(),
            abstract_text: "A view for presenting a stack of views.".into(),
            platforms: vec![],
            tokens: entry_tokens("NavigationView", "/documentation/swiftui/navigationview"),
            file_path: "x.json".into(),
        };
        let view = tokenize("view");
        assert_eq!(token_score(&entry, &view), TITLE_SCORE + TOKEN_SCORE + ABSTRACT_SCORE);
        let stack = tokenize("stack");
        assert_eq!(token_score(&entry, &stack), ABSTRACT_SCORE);
    }
}
