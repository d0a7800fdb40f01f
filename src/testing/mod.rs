use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::Principal;
use crate::cache::CacheInvalidator;
use crate::database::{DatabaseError, MemoryProjectRepository, ProjectRepository};
use crate::database::models::project::{Project, ProjectFields, ProjectFilter};
use crate::services::ProjectService;

/// Invalidator that remembers every tag it was asked to revalidate
#[derive(Default)]
pub struct RecordingInvalidator {
    tags: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.tags.lock().unwrap())
    }
}

impl CacheInvalidator for RecordingInvalidator {
    fn revalidate_tag(&self, tag: &str) {
        self.tags.lock().unwrap().push(tag.to_string());
    }
}

/// Repository whose writes always fail, for storage-error paths
pub struct FailingWrites {
    pub inner: MemoryProjectRepository,
}

#[async_trait]
impl ProjectRepository for FailingWrites {
    async fn create(&self, _owner_email: &str, _fields: &ProjectFields) -> Result<Project, DatabaseError> {
        Err(DatabaseError::Decode("simulated write failure".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_owner(&self, owner_email: &str, filter: &ProjectFilter) -> Result<Vec<Project>, DatabaseError> {
        self.inner.list_by_owner(owner_email, filter).await
    }

    async fn list_public(&self) -> Result<Vec<Project>, DatabaseError> {
        self.inner.list_public().await
    }

    async fn update(&self, _id: Uuid, _fields: &ProjectFields) -> Result<Project, DatabaseError> {
        Err(DatabaseError::Decode("simulated write failure".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DatabaseError> {
        Err(DatabaseError::Decode("simulated write failure".to_string()))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Mutation service over an in-memory repository with recorded invalidations
pub struct Harness {
    pub repository: Arc<MemoryProjectRepository>,
    pub invalidator: Arc<RecordingInvalidator>,
    pub service: ProjectService,
}

impl Harness {
    pub fn new() -> Self {
        let repository = Arc::new(MemoryProjectRepository::new());
        let invalidator = Arc::new(RecordingInvalidator::default());
        let service = ProjectService::new(repository.clone(), invalidator.clone());
        Self {
            repository,
            invalidator,
            service,
        }
    }

    /// Create a project as `owner` and forget the invalidations it caused
    pub async fn seed(&self, owner: &str, name: &str, is_public: bool) -> Project {
        let project = self
            .service
            .create(Some(&Principal::new(owner)), &project_input(name, "PLANNED", is_public))
            .await
            .expect("seed project");
        self.invalidator.take();
        project
    }
}

pub fn project_input(name: &str, status: &str, is_public: bool) -> Value {
    json!({
        "name": name,
        "description": "",
        "status": status,
        "isPublic": is_public,
    })
}
