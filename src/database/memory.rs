use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::project::{Project, ProjectFields, ProjectFilter};
use crate::database::repository::ProjectRepository;

/// Process-local repository used when no database is configured and in tests
#[derive(Default)]
pub struct MemoryProjectRepository {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    projects: HashMap<Uuid, Project>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Strictly increasing clock so `updated_at` ordering is total
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.projects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn newest_first(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    projects
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn create(&self, owner_email: &str, fields: &ProjectFields) -> Result<Project, DatabaseError> {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();
        let project = Project {
            id: Uuid::new_v4(),
            owner_email: owner_email.to_string(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            status: fields.status,
            is_public: fields.is_public,
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        Ok(self.state.read().await.projects.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_email: &str, filter: &ProjectFilter) -> Result<Vec<Project>, DatabaseError> {
        let state = self.state.read().await;
        let projects = state
            .projects
            .values()
            .filter(|p| p.is_owned_by(owner_email) && filter.matches(p))
            .cloned()
            .collect();
        Ok(newest_first(projects))
    }

    async fn list_public(&self) -> Result<Vec<Project>, DatabaseError> {
        let state = self.state.read().await;
        let projects = state.projects.values().filter(|p| p.is_public).cloned().collect();
        Ok(newest_first(projects))
    }

    async fn update(&self, id: Uuid, fields: &ProjectFields) -> Result<Project, DatabaseError> {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();
        let project = state
            .projects
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("project {}", id)))?;

        project.name = fields.name.clone();
        project.description = fields.description.clone();
        project.status = fields.status;
        project.is_public = fields.is_public;
        project.updated_at = now;
        Ok(project.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        match self.state.write().await.projects.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("project {}", id))),
        }
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
