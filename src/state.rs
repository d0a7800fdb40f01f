use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{current_principal, Principal, SessionCodec, SessionError};
use crate::cache::ProjectCache;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryProjectRepository, PgProjectRepository, ProjectRepository};
use crate::services::{ProjectActions, ProjectQueries, ProjectService};

/// Everything a request handler needs, shared behind an `Arc`
pub struct AppState {
    pub config: AppConfig,
    pub repository: Arc<dyn ProjectRepository>,
    pub cache: Arc<ProjectCache>,
    pub sessions: SessionCodec,
    pub projects: ProjectService,
    pub queries: ProjectQueries,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn ProjectRepository>) -> Result<Self, SessionError> {
        let sessions = SessionCodec::from_config(&config.session)?;
        let cache = Arc::new(ProjectCache::new(&config.cache));
        let projects = ProjectService::new(repository.clone(), cache.clone());
        let queries = ProjectQueries::new(repository.clone(), cache.clone());

        Ok(Self {
            config,
            repository,
            cache,
            sessions,
            projects,
            queries,
        })
    }

    /// Postgres when `DATABASE_URL` is set, otherwise an in-memory store
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let repository: Arc<dyn ProjectRepository> = match config.database.url {
            Some(_) => {
                let db = DatabaseManager::connect(&config.database).await?;
                db.ensure_schema().await?;
                info!("Using PostgreSQL project repository");
                Arc::new(PgProjectRepository::new(db))
            }
            None => {
                warn!("DATABASE_URL not set; projects are kept in memory and lost on restart");
                Arc::new(MemoryProjectRepository::new())
            }
        };
        Ok(Self::new(config, repository)?)
    }

    /// In-memory state for tests and local experiments
    pub fn in_memory(config: AppConfig) -> Result<Self, SessionError> {
        Self::new(config, Arc::new(MemoryProjectRepository::new()))
    }

    pub fn principal(&self, headers: &HeaderMap) -> Option<Principal> {
        current_principal(&self.sessions, headers)
    }

    /// Mutation entry points bound to `principal`
    pub fn actions(&self, principal: Option<Principal>) -> ProjectActions {
        ProjectActions::new(self.projects.clone(), principal)
    }
}
