//! # appledocs-core
//!
//! Core functionality for appledocs - a caching proxy and local search engine for
//! Apple developer documentation.
//!
//! This crate fetches documentation JSON from the upstream API, keeps it in a
//! two-tier cache (a short-lived in-memory response cache and a durable on-disk
//! document cache), and answers symbol queries from a local index built by
//! scanning that disk cache.
//!
//! ## Architecture
//!
//! - **Transport**: [`Fetcher`] with timeout, exponential backoff and response validation
//! - **Storage**: [`DiskCache`] with sanitized and hashed file names, self-healing loads
//! - **Client**: [`DocsClient`] read-through retrieval of frameworks, symbols and technologies
//! - **Search**: [`LocalSymbolIndex`] over the disk cache, [`FrameworkIndex`] plus
//!   [`scoring`] as the fallback
//! - **Session**: [`SessionState`] with atomic invalidation on technology change
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use appledocs_core::{Config, DocsClient, LocalSymbolIndex, Result};
//!
//! # async fn run() -> Result<()> {
//! let config = Config::load()?;
//! let client = DocsClient::new(&config)?;
//!
//! let swiftui = client.get_framework("SwiftUI").await?;
//! println!("{} references", swiftui.references.len());
//!
//! let index = LocalSymbolIndex::new(&config.cache.dir, Some("swiftui".into()), &config.search);
//! index.build_index_from_cache().await?;
//! for hit in index.search("Navigation*", 5).await {
//!     println!("{} ({})", hit.entry.title, hit.entry.path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Transient network failures are
//! retried internally; what reaches the caller is either permanent or
//! [`Error::RetriesExhausted`]:
//!
//! ```rust
//! use appledocs_core::Error;
//!
//! fn describe(err: &Error) -> &'static str {
//!     match err {
//!         Error::NotFound(_) => "missing",
//!         Error::RetriesExhausted { .. } => "upstream unavailable",
//!         e if e.is_recoverable() => "transient",
//!         _ => "fatal",
//!     }
//! }
//!
//! assert_eq!(describe(&Error::NotFound("x".into())), "missing");
//! ```

/// Read-through documentation client
pub mod client;
/// Configuration loading and environment overrides
pub mod config;
/// Rich-content blocks and their visitor
pub mod content;
/// Error types and result aliases
pub mod error;
/// HTTP transport with retry and response cache
pub mod fetcher;
/// Token table over a framework's references
pub mod framework_index;
/// Per-key async locks
pub mod keyed_lock;
/// Disk-cache backed symbol index
pub mod local_index;
/// LRU + TTL in-memory cache
pub mod memory_cache;
/// Token-set relevance scoring
pub mod scoring;
/// Session state
pub mod session;
/// On-disk document cache
pub mod storage;
/// Identifier tokenization
pub mod tokenize;
/// Documentation payload types
pub mod types;

pub use client::{DocsClient, FrameworkSearchHit, FrameworkSearchOptions, Origin};
pub use config::{CacheConfig, Config, HttpConfig, SearchConfig};
pub use error::{Error, Result};
pub use fetcher::{Fetcher, HttpBackend, ReqwestBackend, RetryPolicy};
pub use framework_index::{FrameworkIndex, FrameworkIndexEntry};
pub use keyed_lock::KeyedLocks;
pub use local_index::{BuildSummary, IndexStatus, LocalSymbolIndex, LocalSymbolIndexEntry, ScoredEntry};
pub use memory_cache::MemoryCache;
pub use session::{DiscoverySnapshot, SessionState};
pub use storage::{DiskCache, DiskStats};
pub use types::*;
