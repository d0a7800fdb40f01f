//! Tag-indexed read-through cache.
//!
//! Entries live in a primary `key -> entry` map; a secondary `tag -> keys`
//! index lets a write evict every entry it may have made stale without
//! knowing the keys. Entries also expire after a fixed TTL, which bounds
//! staleness when an invalidation is missed.
//!
//! Loads run outside the lock. A read racing a write may repopulate an entry
//! with pre-write data; that entry lives until the next invalidation or TTL.
//!
//! Expired entries are dropped when their key is next loaded, by a sweep every
//! [`SWEEP_EVERY`] inserts, and by whoever calls [`TagCache::purge_expired`].

pub mod projects;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::CacheConfig;

pub use projects::{keys, tags, ProjectCache};

/// Inserts between inline sweeps of expired entries
pub const SWEEP_EVERY: usize = 256;

/// Write-side view of a cache: evict by tag
pub trait CacheInvalidator: Send + Sync {
    fn revalidate_tag(&self, tag: &str);
}

struct CacheEntry<V> {
    value: V,
    tags: Vec<String>,
    expires_at: Instant,
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    tag_index: HashMap<String, HashSet<String>>,
    inserts: usize,
}

impl<V> Default for CacheState<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            tag_index: HashMap::new(),
            inserts: 0,
        }
    }
}

impl<V> CacheState<V> {
    fn remove_key(&mut self, key: &str) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };
        for tag in &entry.tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
        true
    }

    fn remove_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove_key(key);
        }
        expired.len()
    }
}

pub struct TagCache<V> {
    state: RwLock<CacheState<V>>,
    ttl: Duration,
    enabled: bool,
}

impl<V: Clone> TagCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            ttl,
            enabled: true,
        }
    }

    /// A cache that never stores anything; every read hits the loader
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(config.ttl())
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fresh value for `key`, if any
    pub fn get(&self, key: &str) -> Option<V> {
        let state = self.read();
        state
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: &str, value: V, tags: &[String]) {
        if !self.enabled {
            return;
        }
        let mut state = self.write();
        state.inserts = state.inserts.wrapping_add(1);
        if state.inserts % SWEEP_EVERY == 0 {
            let swept = state.remove_expired(Instant::now());
            if swept > 0 {
                tracing::debug!(swept, "swept expired cache entries");
            }
        }
        state.remove_key(key);
        for tag in tags {
            state.tag_index.entry(tag.clone()).or_default().insert(key.to_string());
        }
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                tags: tags.to_vec(),
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Return the cached value for `key`, or run `loader` and cache its result
    /// under `tags`. Loader errors are returned and nothing is cached.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, tags: &[String], loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            tracing::trace!(key, "cache hit");
            return Ok(value);
        }
        self.evict_if_expired(key);

        let value = loader().await?;
        self.insert(key, value.clone(), tags);
        Ok(value)
    }

    /// Evict every entry carrying `tag`. Returns the number of entries removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut state = self.write();
        let Some(keys) = state.tag_index.remove(tag) else {
            return 0;
        };
        let mut removed = 0;
        for key in &keys {
            if state.remove_key(key) {
                removed += 1;
            }
        }
        tracing::debug!(tag, removed, "cache tag invalidated");
        removed
    }

    pub fn invalidate_key(&self, key: &str) -> bool {
        self.write().remove_key(key)
    }

    /// Drop entries whose TTL has elapsed
    pub fn purge_expired(&self) -> usize {
        self.write().remove_expired(Instant::now())
    }

    fn evict_if_expired(&self, key: &str) {
        let now = Instant::now();
        let mut state = self.write();
        if state.entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            state.remove_key(key);
        }
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        *self.write() = CacheState::default();
    }

    // Poisoning is ignored: both maps are consistent after every write.
    fn read(&self) -> RwLockReadGuard<'_, CacheState<V>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState<V>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<V: Clone + Send + Sync> CacheInvalidator for TagCache<V> {
    fn revalidate_tag(&self, tag: &str) {
        self.invalidate_tag(tag);
    }
}
