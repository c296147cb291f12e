//! JSON document cache on disk.
//!
//! Frameworks live in `<sanitized name>.json`, symbols in
//! `<last segment>_<hash>.json`, and the technology list in
//! [`TECHNOLOGIES_FILE`]. Writes go through a temporary file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::types::{FrameworkData, SymbolData, Technology, TechnologyMap};
use crate::{Error, Result};

/// File holding the technology list.
pub const TECHNOLOGIES_FILE: &str = "technologies.json";

const SYMBOL_PREFIX_MAX: usize = 32;
const SYMBOL_HASH_HEX_LEN: usize = 16;

/// File counts and sizes by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    /// Framework documents.
    pub framework_files: usize,
    /// Symbol documents.
    pub symbol_files: usize,
    /// Whether the technology list is cached.
    pub has_technologies: bool,
    /// Total bytes across all JSON files.
    pub total_bytes: u64,
}

/// On-disk JSON document cache.
///
/// Loads never fail: a missing, unreadable or schema-invalid file is a miss, so a
/// corrupt entry heals itself on the next fetch.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Cache rooted at `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache root.
    pub fn cache_dir(&self) -> &Path {
        &self.dir
    }

    /// Lower-case `name`, replacing anything outside `[A-Za-z0-9-]` with `_`.
    pub fn sanitize(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// `<sanitized>.json`. Distinct names may collide.
    pub fn framework_file_name(name: &str) -> String {
        format!("{}.json", Self::sanitize(name))
    }

    /// `<prefix>_<hash>.json`, where prefix is the sanitized last path segment
    /// and hash the first 16 hex chars of the path's SHA-256.
    pub fn symbol_file_name(path: &str) -> String {
        let segment = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        let prefix: String = Self::sanitize(segment)
            .chars()
            .take(SYMBOL_PREFIX_MAX)
            .collect();
        let digest = Sha256::digest(path.as_bytes());
        let hex: String = digest
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>()
            .chars()
            .take(SYMBOL_HASH_HEX_LEN)
            .collect();
        format!("{prefix}_{hex}.json")
    }

    /// Cached framework document, if present and valid.
    pub fn load_framework(&self, name: &str) -> Option<FrameworkData> {
        let path = self.dir.join(Self::framework_file_name(name));
        let value = self.read_json(&path)?;
        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding invalid framework cache entry");
                None
            },
        }
    }

    /// Persist a framework document.
    pub fn save_framework(&self, name: &str, data: &FrameworkData) -> Result<()> {
        self.write_json(&Self::framework_file_name(name), data)
    }

    /// Cached symbol document, if present and valid.
    pub fn load_symbol(&self, path: &str) -> Option<SymbolData> {
        let file = self.dir.join(Self::symbol_file_name(path));
        let value = self.read_json(&file)?;
        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(path = %file.display(), error = %e, "discarding invalid symbol cache entry");
                None
            },
        }
    }

    /// Persist a symbol document.
    pub fn save_symbol(&self, path: &str, data: &SymbolData) -> Result<()> {
        self.write_json(&Self::symbol_file_name(path), data)
    }

    /// Cached technology list. Accepts `{"references": {...}}` or a bare map;
    /// entries that fail to parse are dropped, and an empty list is a miss.
    pub fn load_technologies(&self) -> Option<TechnologyMap> {
        let value = self.read_json(&self.dir.join(TECHNOLOGIES_FILE))?;
        let map = parse_technologies(&value);
        if map.is_empty() { None } else { Some(map) }
    }

    /// Persist the technology list as a bare map.
    pub fn save_technologies(&self, technologies: &TechnologyMap) -> Result<()> {
        self.write_json(TECHNOLOGIES_FILE, technologies)
    }

    /// Count files by category.
    pub fn stats(&self) -> DiskStats {
        let mut stats = DiskStats::default();
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return stats;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            stats.total_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            if name == TECHNOLOGIES_FILE {
                stats.has_technologies = true;
            } else if is_symbol_stem(stem) {
                stats.symbol_files += 1;
            } else {
                stats.framework_files += 1;
            }
        }
        stats
    }

    /// Remove every cached JSON file. Other files in the directory are left alone.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read cache directory {}: {e}",
                    self.dir.display()
                )));
            },
        };
        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|e| {
                    Error::Storage(format!("Failed to remove {}: {e}", path.display()))
                })?;
                removed += 1;
            }
        }
        debug!(removed, dir = %self.dir.display(), "cleared disk cache");
        Ok(removed)
    }

    fn read_json(&self, path: &Path) -> Option<Value> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read cache file");
                return None;
            },
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache file is not valid JSON");
                None
            },
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, data: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Storage(format!(
                "Failed to create cache directory {}: {e}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| Error::Storage(format!("Failed to serialize {file_name}: {e}")))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| Error::Storage(format!("Failed to write temp file for {file_name}: {e}")))?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to replace {file_name}: {e}")))?;
        }
        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to persist {file_name}: {e}")))?;

        debug!(file = file_name, "saved cache file");
        Ok(())
    }
}

/// Parse a technology list from either the upstream envelope or a bare map.
///
/// Malformed entries are skipped. Keys of the result are technology identifiers.
pub fn parse_technologies(value: &Value) -> TechnologyMap {
    let source = value
        .get("references")
        .and_then(Value::as_object)
        .or_else(|| value.as_object());
    let Some(source) = source else {
        return BTreeMap::new();
    };

    source
        .iter()
        .filter_map(|(key, entry)| match serde_json::from_value::<Technology>(entry.clone()) {
            Ok(tech) => Some((key.clone(), tech)),
            Err(e) => {
                debug!(key, error = %e, "skipping malformed technology entry");
                None
            },
        })
        .collect()
}

fn is_symbol_stem(stem: &str) -> bool {
    stem.rsplit_once('_').is_some_and(|(_, hash)| {
        hash.len() == SYMBOL_HASH_HEX_LEN && hash.chars().all(|c| c.is_ascii_hexdigit())
    })
}
