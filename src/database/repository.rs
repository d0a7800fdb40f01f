use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::project::{Project, ProjectFields, ProjectFilter, ProjectRow};
use crate::database::query_builder::{bind_params, QueryBuilder};

/// Persistence contract for projects. No authorization happens here;
/// callers enforce ownership and visibility.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, owner_email: &str, fields: &ProjectFields) -> Result<Project, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DatabaseError>;

    /// Owner's projects, newest `updated_at` first
    async fn list_by_owner(&self, owner_email: &str, filter: &ProjectFilter) -> Result<Vec<Project>, DatabaseError>;

    /// Every public project, newest `updated_at` first
    async fn list_public(&self) -> Result<Vec<Project>, DatabaseError>;

    /// Replace all mutable fields and refresh `updated_at`
    async fn update(&self, id: Uuid, fields: &ProjectFields) -> Result<Project, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub struct PgProjectRepository {
    db: DatabaseManager,
}

impl PgProjectRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    fn pool(&self) -> &PgPool {
        self.db.pool()
    }

    async fn fetch_list(&self, builder: QueryBuilder) -> Result<Vec<Project>, DatabaseError> {
        let sql = builder.build();
        let rows = bind_params(sqlx::query_as::<_, ProjectRow>(&sql.query), &sql.params)
            .fetch_all(self.pool())
            .await?;
        rows.into_iter()
            .map(|row| Project::try_from(row).map_err(DatabaseError::from))
            .collect()
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn create(&self, owner_email: &str, fields: &ProjectFields) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ProjectRow>(
            "INSERT INTO projects (id, owner_email, name, description, status, is_public, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id, owner_email, name, description, status, is_public, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(owner_email)
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(fields.status.as_str())
        .bind(fields.is_public)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(Project::try_from(row)?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, owner_email, name, description, status, is_public, created_at, updated_at
             FROM projects
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Project::try_from).transpose()?)
    }

    async fn list_by_owner(&self, owner_email: &str, filter: &ProjectFilter) -> Result<Vec<Project>, DatabaseError> {
        self.fetch_list(QueryBuilder::owner_projects(owner_email, filter)).await
    }

    async fn list_public(&self) -> Result<Vec<Project>, DatabaseError> {
        self.fetch_list(QueryBuilder::public_projects()).await
    }

    async fn update(&self, id: Uuid, fields: &ProjectFields) -> Result<Project, DatabaseError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "UPDATE projects
             SET name = $2, description = $3, status = $4, is_public = $5, updated_at = $6
             WHERE id = $1
             RETURNING id, owner_email, name, description, status, is_public, created_at, updated_at",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(fields.status.as_str())
        .bind(fields.is_public)
        .bind(Utc::now())
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Project::try_from(row)?),
            None => Err(DatabaseError::NotFound(format!("project {}", id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("project {}", id)));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }
}
