use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use super::{CacheInvalidator, TagCache};
use crate::config::CacheConfig;
use crate::database::models::project::{Project, ProjectFilter};

/// Invalidation tags
pub mod tags {
    use uuid::Uuid;

    pub const PUBLIC_PROJECTS: &str = "projects:public";

    pub fn user_projects(email: &str) -> String {
        format!("projects:user:{}", email)
    }

    pub fn project(id: Uuid) -> String {
        format!("project:{}", id)
    }
}

/// Cache keys
pub mod keys {
    use uuid::Uuid;

    use crate::database::models::project::ProjectFilter;

    pub const PUBLIC_PROJECTS: &str = "public-projects";

    /// `projects-user-<email>-<status|all>-<search>`
    pub fn user_projects(email: &str, filter: &ProjectFilter) -> String {
        let status = filter.status.map(|s| s.as_str()).unwrap_or("all");
        let search = filter.name_contains.as_deref().unwrap_or_default();
        format!("projects-user-{}-{}-{}", email, status, search)
    }

    pub fn project(id: Uuid) -> String {
        format!("project-{}", id)
    }
}

/// Read caches for project lists and single projects, invalidated together.
/// Only found projects are recorded; a miss is never cached.
pub struct ProjectCache {
    pub lists: TagCache<Vec<Project>>,
    pub records: TagCache<Project>,
}

impl ProjectCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            lists: TagCache::from_config(config),
            records: TagCache::from_config(config),
        }
    }

    pub fn disabled() -> Self {
        Self {
            lists: TagCache::disabled(),
            records: TagCache::disabled(),
        }
    }

    pub fn owner_list_entry(email: &str, filter: &ProjectFilter) -> (String, Vec<String>) {
        (keys::user_projects(email, filter), vec![tags::user_projects(email)])
    }

    pub fn public_list_entry() -> (String, Vec<String>) {
        (keys::PUBLIC_PROJECTS.to_string(), vec![tags::PUBLIC_PROJECTS.to_string()])
    }

    pub fn record_entry(id: Uuid) -> (String, Vec<String>) {
        (keys::project(id), vec![tags::project(id)])
    }

    /// Total entries across both caches
    pub fn len(&self) -> usize {
        self.lists.len() + self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn purge_expired(&self) -> usize {
        self.lists.purge_expired() + self.records.purge_expired()
    }

    /// Purge expired entries every `every` until the cache is dropped.
    /// `None` when caching is off or the period is zero.
    pub fn spawn_purger(self: &Arc<Self>, every: Duration) -> Option<JoinHandle<()>> {
        if every.is_zero() || !self.lists.is_enabled() {
            return None;
        }
        let cache: Weak<Self> = Arc::downgrade(self);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "purged expired project cache entries");
                }
            }
        }))
    }
}

impl CacheInvalidator for ProjectCache {
    fn revalidate_tag(&self, tag: &str) {
        let removed = self.lists.invalidate_tag(tag) + self.records.invalidate_tag(tag);
        tracing::debug!(tag, removed, "revalidated project caches");
    }
}
