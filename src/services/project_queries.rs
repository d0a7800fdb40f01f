use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{require_authenticated, Principal};
use crate::cache::ProjectCache;
use crate::database::models::project::{Project, ProjectFilter};
use crate::database::ProjectRepository;
use crate::error::ServiceError;

/// Cached read path for projects
#[derive(Clone)]
pub struct ProjectQueries {
    repository: Arc<dyn ProjectRepository>,
    cache: Arc<ProjectCache>,
}

impl ProjectQueries {
    pub fn new(repository: Arc<dyn ProjectRepository>, cache: Arc<ProjectCache>) -> Self {
        Self { repository, cache }
    }

    /// The signed-in user's projects, narrowed by `filter`
    pub async fn list_for_owner(
        &self,
        principal: Option<&Principal>,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, ServiceError> {
        let principal = require_authenticated(principal)?;
        let (key, tags) = ProjectCache::owner_list_entry(&principal.email, filter);
        let projects = self
            .cache
            .lists
            .get_or_load(&key, &tags, || self.repository.list_by_owner(&principal.email, filter))
            .await?;
        Ok(projects)
    }

    /// Every public project, for anyone
    pub async fn list_public(&self) -> Result<Vec<Project>, ServiceError> {
        let (key, tags) = ProjectCache::public_list_entry();
        let projects = self
            .cache
            .lists
            .get_or_load(&key, &tags, || self.repository.list_public())
            .await?;
        Ok(projects)
    }

    /// Unauthorized single lookup, cached per id. Misses always reach storage.
    pub async fn find(&self, id: Uuid) -> Result<Option<Project>, ServiceError> {
        let (key, tags) = ProjectCache::record_entry(id);
        if let Some(project) = self.cache.records.get(&key) {
            return Ok(Some(project));
        }

        let project = self.repository.find_by_id(id).await?;
        if let Some(found) = &project {
            self.cache.records.insert(&key, found.clone(), &tags);
        }
        Ok(project)
    }

    /// Detail view: public projects for anyone, private ones for their owner.
    /// Everything else, including ids that are not UUIDs, is `NotFound`.
    pub async fn detail(&self, raw_id: &str, viewer: Option<&Principal>) -> Result<Project, ServiceError> {
        let Ok(id) = Uuid::parse_str(raw_id.trim()) else {
            return Err(ServiceError::NotFound);
        };
        match self.find(id).await? {
            Some(project) if project.is_visible_to(viewer.map(|p| p.email.as_str())) => Ok(project),
            _ => Err(ServiceError::NotFound),
        }
    }
}
