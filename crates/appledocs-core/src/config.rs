//! Configuration management for the appledocs cache and search stack.
//!
//! Configuration is layered:
//!
//! 1. **Defaults**: [`Config::default`]
//! 2. **Config file**: `config.toml` in the platform config directory, or an explicit path
//! 3. **Environment variables**: `APPLEDOCS_*` overrides, applied last
//!
//! ## Example Configuration File
//!
//! ```toml
//! [http]
//! base_url = "https://developer.apple.com/tutorials/data"
//! timeout_ms = 15000
//! max_retries = 3
//! retry_base_delay_ms = 1000
//! max_concurrent_requests = 5
//!
//! [cache]
//! dir = "/home/user/.cache/appledocs"
//! ttl_secs = 1800
//! max_entries = 500
//!
//! [search]
//! default_max_results = 20
//! index_batch_size = 10
//! min_symbol_count = 50
//! file_read_timeout_ms = 5000
//! ```
//!
//! ## Loading
//!
//! ```rust,no_run
//! use appledocs_core::Config;
//!
//! let config = Config::load()?;
//! println!("Cache dir: {}", config.cache.dir.display());
//! # Ok::<(), appledocs_core::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default upstream documentation API root.
pub const DEFAULT_BASE_URL: &str = "https://developer.apple.com/tutorials/data";

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "APPLEDOCS_";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outbound HTTP behavior.
    pub http: HttpConfig,
    /// Memory and disk cache behavior.
    pub cache: CacheConfig,
    /// Local index and search behavior.
    pub search: SearchConfig,
}

/// Outbound HTTP settings used by [`crate::Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Documentation API root every request path is joined to.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total attempts per request, initial attempt included.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each later retry.
    pub retry_base_delay_ms: u64,
    /// Upper bound on concurrent outbound requests during fan-outs.
    pub max_concurrent_requests: usize,
}

/// Memory tier and disk tier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cached JSON documents.
    pub dir: PathBuf,
    /// Lifetime of in-memory response cache entries, in seconds.
    pub ttl_secs: u64,
    /// Maximum number of in-memory response cache entries.
    pub max_entries: usize,
}

/// Local index and search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result cap when the caller does not supply one.
    pub default_max_results: usize,
    /// Number of cache files read concurrently during an index build.
    pub index_batch_size: usize,
    /// Below this many local entries, search falls back to the framework index.
    pub min_symbol_count: usize,
    /// Per-file read timeout during an index build, in milliseconds.
    pub file_read_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 15_000,
            max_retries: 3,
            retry_base_delay_ms: 1_000,
            max_concurrent_requests: 5,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_secs: 30 * 60,
            max_entries: 500,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: 20,
            index_batch_size: 10,
            min_symbol_count: 50,
            file_read_timeout_ms: 5_000,
        }
    }
}

impl HttpConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base retry delay as a [`Duration`].
    #[must_use]
    pub const fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl CacheConfig {
    /// Memory tier TTL as a [`Duration`].
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl SearchConfig {
    /// Per-file read timeout as a [`Duration`].
    #[must_use]
    pub const fn file_read_timeout(&self) -> Duration {
        Duration::from_millis(self.file_read_timeout_ms)
    }
}

impl Config {
    /// Load configuration from the default location, then apply environment overrides.
    ///
    /// A missing config file is not an error; defaults are used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or parsed,
    /// or if an environment override holds an unparseable value.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Location of the default config file, if the platform exposes one.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "appledocs", "appledocs")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply `APPLEDOCS_*` overrides using the supplied variable lookup.
    ///
    /// The lookup is injected so tests do not have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(dir) = get("CACHE_DIR") {
            self.cache.dir = PathBuf::from(dir);
        }
        if let Some(url) = get("BASE_URL") {
            self.http.base_url = url;
        }
        override_parsed(&get, "HTTP_TIMEOUT_MS", &mut self.http.timeout_ms)?;
        override_parsed(&get, "MAX_RETRIES", &mut self.http.max_retries)?;
        override_parsed(&get, "RETRY_DELAY_MS", &mut self.http.retry_base_delay_ms)?;
        override_parsed(&get, "MAX_CONCURRENT", &mut self.http.max_concurrent_requests)?;
        override_parsed(&get, "CACHE_TTL_SECS", &mut self.cache.ttl_secs)?;
        override_parsed(&get, "CACHE_MAX_ENTRIES", &mut self.cache.max_entries)?;
        override_parsed(&get, "MAX_RESULTS", &mut self.search.default_max_results)?;
        override_parsed(&get, "INDEX_BATCH_SIZE", &mut self.search.index_batch_size)?;
        override_parsed(&get, "MIN_SYMBOL_COUNT", &mut self.search.min_symbol_count)?;
        override_parsed(
            &get,
            "FILE_READ_TIMEOUT_MS",
            &mut self.search.file_read_timeout_ms,
        )?;
        Ok(())
    }

    /// Reject values that would make the system misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.http.max_retries == 0 {
            return Err(Error::Config("http.max_retries must be at least 1".into()));
        }
        if self.http.max_concurrent_requests == 0 {
            return Err(Error::Config(
                "http.max_concurrent_requests must be at least 1".into(),
            ));
        }
        if self.search.index_batch_size == 0 {
            return Err(Error::Config(
                "search.index_batch_size must be at least 1".into(),
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(Error::Config("cache.max_entries must be at least 1".into()));
        }
        let lower = self.http.base_url.to_lowercase();
        if !lower.starts_with("http://") && !lower.starts_with("https://") {
            return Err(Error::Config(format!(
                "http.base_url must start with http:// or https:// (got '{}')",
                self.http.base_url
            )));
        }
        Ok(())
    }
}

fn override_parsed<G, T>(get: &G, name: &str, slot: &mut T) -> Result<()>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = get(name) {
        *slot = raw
            .parse()
            .map_err(|_| Error::Config(format!("{ENV_PREFIX}{name} has invalid value '{raw}'")))?;
    }
    Ok(())
}

fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "appledocs", "appledocs").map_or_else(
        || {
            directories::BaseDirs::new().map_or_else(
                || PathBuf::from(".appledocs/cache"),
                |base| base.home_dir().join(".appledocs").join("cache"),
            )
        },
        |dirs| dirs.cache_dir().to_path_buf(),
    )
}
