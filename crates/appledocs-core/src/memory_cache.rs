//! Bounded in-process cache with LRU eviction and TTL expiry.
//!
//! Expired entries are purged lazily on the next `get` for their key. The clock is
//! [`tokio::time::Instant`], so paused-time tests can advance it deterministically.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::time::Instant;

/// A cached value together with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Cached value.
    pub data: V,
    /// When the value was stored.
    pub timestamp: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) >= ttl
    }
}

/// LRU + TTL cache keyed by string.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    // Front is least recently used.
    order: VecDeque<String>,
    max_size: usize,
    ttl: Duration,
}

impl<V: Clone> MemoryCache<V> {
    /// Create a cache holding at most `max_size` entries, each living for `ttl`.
    ///
    /// A `max_size` of zero is treated as one.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_size: max_size.max(1),
            ttl,
        }
    }

    /// Look up a live entry, refreshing its recency.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        let expired = self.entries.get(key)?.is_expired(self.ttl, now);
        if expired {
            self.entries.remove(key);
            self.forget(key);
            return None;
        }
        self.touch(key);
        self.entries.get(key).map(|e| e.data.clone())
    }

    /// Insert or replace an entry, evicting the least recently used one when full.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if self.entries.contains_key(&key) {
            self.touch(&key);
        } else {
            while self.entries.len() >= self.max_size {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
            }
            self.order.push_back(key.clone());
        }
        self.entries.insert(
            key,
            CacheEntry {
                data: value,
                timestamp: Instant::now(),
            },
        );
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn forget(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }
}
