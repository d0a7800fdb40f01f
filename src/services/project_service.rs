use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{require_authenticated, require_ownership, Principal};
use crate::cache::{tags, CacheInvalidator};
use crate::database::models::project::Project;
use crate::database::ProjectRepository;
use crate::error::ServiceError;
use crate::validation::{validate_project, validate_project_id};

/// Write path for projects: authenticate, validate, check ownership,
/// persist, then invalidate the cache tags the write touched.
///
/// A failed call performs no write and invalidates nothing.
#[derive(Clone)]
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        Self {
            repository,
            invalidator,
        }
    }

    pub async fn create(&self, principal: Option<&Principal>, input: &Value) -> Result<Project, ServiceError> {
        let principal = require_authenticated(principal)?;
        let fields = validate_project(input)?;

        let project = self.repository.create(&principal.email, &fields).await?;
        info!("Created project {} for {}", project.id, principal.email);

        self.invalidator.revalidate_tag(&tags::user_projects(&principal.email));
        if project.is_public {
            self.invalidator.revalidate_tag(tags::PUBLIC_PROJECTS);
        }
        Ok(project)
    }

    pub async fn update(&self, principal: Option<&Principal>, id: &str, input: &Value) -> Result<Project, ServiceError> {
        let principal = require_authenticated(principal)?;
        let id = validate_project_id(id)?;
        let fields = validate_project(input)?;

        let existing = self.find_existing(id).await?;
        require_ownership(&existing.owner_email, principal)?;

        let updated = self.repository.update(existing.id, &fields).await?;
        info!("Updated project {}", updated.id);

        self.invalidator.revalidate_tag(&tags::project(updated.id));
        self.invalidator.revalidate_tag(&tags::user_projects(&existing.owner_email));
        // The public list changes when a project joins or leaves it
        if existing.is_public || updated.is_public {
            self.invalidator.revalidate_tag(tags::PUBLIC_PROJECTS);
        }
        Ok(updated)
    }

    pub async fn delete(&self, principal: Option<&Principal>, id: &str) -> Result<(), ServiceError> {
        let principal = require_authenticated(principal)?;
        let id = validate_project_id(id)?;

        let existing = self.find_existing(id).await?;
        require_ownership(&existing.owner_email, principal)?;
        let was_public = existing.is_public;

        self.repository.delete(existing.id).await?;
        info!("Deleted project {}", existing.id);

        self.invalidator.revalidate_tag(&tags::project(existing.id));
        self.invalidator.revalidate_tag(&tags::user_projects(&existing.owner_email));
        if was_public {
            self.invalidator.revalidate_tag(tags::PUBLIC_PROJECTS);
        }
        Ok(())
    }

    /// Ids that are not UUIDs cannot name a stored project
    async fn find_existing(&self, id: &str) -> Result<Project, ServiceError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Err(ServiceError::NotFound);
        };
        self.repository.find_by_id(id).await?.ok_or(ServiceError::NotFound)
    }
}
