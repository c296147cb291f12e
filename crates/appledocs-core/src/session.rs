//! Per-server session state.
//!
//! Holds the active technology and everything derived from it. Switching to a
//! different technology clears the derived slices in a single write-locked step,
//! so readers never observe framework data from one technology next to the local
//! index of another.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::framework_index::FrameworkIndex;
use crate::keyed_lock::KeyedLocks;
use crate::local_index::LocalSymbolIndex;
use crate::types::{FrameworkData, Technology};

/// Result of the most recent technology discovery.
#[derive(Debug, Clone)]
pub struct DiscoverySnapshot {
    /// Keyword filter that was applied, if any.
    pub query: Option<String>,
    /// Matching frameworks in display order.
    pub technologies: Vec<Technology>,
    /// When the discovery ran.
    pub taken_at: DateTime<Utc>,
}

impl DiscoverySnapshot {
    /// Snapshot taken now.
    pub fn new(query: Option<String>, technologies: Vec<Technology>) -> Self {
        Self {
            query,
            technologies,
            taken_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    active: Option<Technology>,
    framework: Option<Arc<FrameworkData>>,
    framework_index: Option<Arc<FrameworkIndex>>,
    expanded: HashSet<String>,
    last_discovery: Option<DiscoverySnapshot>,
    local_index: Option<Arc<LocalSymbolIndex>>,
}

impl Inner {
    fn is_active(&self, identifier: &str) -> bool {
        self.active
            .as_ref()
            .is_some_and(|t| t.identifier == identifier)
    }
}

/// Shared session state.
#[derive(Debug)]
pub struct SessionState {
    inner: RwLock<Inner>,
    index_locks: KeyedLocks,
    cache_dir: PathBuf,
    search: SearchConfig,
}

impl SessionState {
    /// Empty session whose local indexes scan `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>, search: SearchConfig) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            index_locks: KeyedLocks::new(),
            cache_dir: cache_dir.into(),
            search,
        }
    }

    /// Make `technology` active.
    ///
    /// Returns `true` when the identifier changed, in which case framework data,
    /// framework index, expanded identifiers and the local index are dropped.
    /// Re-selecting the active technology leaves derived state untouched.
    pub async fn set_active_technology(&self, technology: Technology) -> bool {
        let mut inner = self.inner.write().await;
        if inner.is_active(&technology.identifier) {
            debug!(technology = %technology.title, "technology already active");
            inner.active = Some(technology);
            return false;
        }
        info!(technology = %technology.title, "switching active technology");
        inner.active = Some(technology);
        inner.framework = None;
        inner.framework_index = None;
        inner.expanded.clear();
        inner.local_index = None;
        true
    }

    /// The active technology.
    pub async fn active_technology(&self) -> Option<Technology> {
        self.inner.read().await.active.clone()
    }

    /// Framework data of the active technology, if loaded.
    pub async fn framework_data(&self) -> Option<Arc<FrameworkData>> {
        self.inner.read().await.framework.clone()
    }

    /// Framework index of the active technology, if built.
    pub async fn framework_index(&self) -> Option<Arc<FrameworkIndex>> {
        self.inner.read().await.framework_index.clone()
    }

    /// Store framework data for `identifier` and build its framework index.
    ///
    /// Ignored when `identifier` is no longer active, which happens when the
    /// technology changed while the data was being fetched.
    pub async fn set_framework_data(&self, identifier: &str, data: FrameworkData) -> bool {
        let index = Arc::new(FrameworkIndex::build(&data));
        let mut inner = self.inner.write().await;
        if !inner.is_active(identifier) {
            debug!(identifier, "discarding framework data for inactive technology");
            return false;
        }
        inner.framework = Some(Arc::new(data));
        inner.framework_index = Some(index);
        true
    }

    /// Record identifiers whose documents have been expanded.
    pub async fn mark_expanded<I>(&self, identifiers: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.inner.write().await.expanded.extend(identifiers);
    }

    /// Whether `identifier` has been expanded.
    pub async fn is_expanded(&self, identifier: &str) -> bool {
        self.inner.read().await.expanded.contains(identifier)
    }

    /// Number of expanded identifiers.
    pub async fn expanded_count(&self) -> usize {
        self.inner.read().await.expanded.len()
    }

    /// Remember the latest discovery result.
    pub async fn set_last_discovery(&self, snapshot: DiscoverySnapshot) {
        self.inner.write().await.last_discovery = Some(snapshot);
    }

    /// The latest discovery result.
    pub async fn last_discovery(&self) -> Option<DiscoverySnapshot> {
        self.inner.read().await.last_discovery.clone()
    }

    /// The local index of the active technology, if one exists.
    pub async fn local_index(&self) -> Option<Arc<LocalSymbolIndex>> {
        self.inner.read().await.local_index.clone()
    }

    /// Local index for the active technology, creating it on first use.
    ///
    /// Creation is serialized per technology; concurrent callers share one index.
    /// Returns `None` when no technology is active.
    pub async fn get_or_create_local_index(&self) -> Option<Arc<LocalSymbolIndex>> {
        let technology = {
            let inner = self.inner.read().await;
            if let Some(index) = &inner.local_index {
                return Some(Arc::clone(index));
            }
            inner.active.clone()?
        };

        let _guard = self.index_locks.lock(&technology.identifier).await;

        {
            let inner = self.inner.read().await;
            if !inner.is_active(&technology.identifier) {
                return None;
            }
            if let Some(index) = &inner.local_index {
                debug!(technology = %technology.title, "local index created by another task");
                return Some(Arc::clone(index));
            }
        }

        let index = Arc::new(LocalSymbolIndex::new(
            self.cache_dir.clone(),
            Some(technology.path_name()),
            &self.search,
        ));

        let mut inner = self.inner.write().await;
        if !inner.is_active(&technology.identifier) {
            return None;
        }
        if let Some(existing) = &inner.local_index {
            return Some(Arc::clone(existing));
        }
        inner.local_index = Some(Arc::clone(&index));
        debug!(technology = %technology.title, "local index created");
        Some(index)
    }
}
