use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::Principal;
use crate::middleware::ActionResult;
use crate::services::ProjectService;
use crate::types::Operation;

/// Payload returned by a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProject {
    pub id: Uuid,
}

/// Mutation entry points as seen by a client.
///
/// Every outcome, including authorization and storage failures, comes back
/// as an [`ActionResult`]; nothing is raised to the caller.
#[async_trait]
pub trait ProjectMutations: Send + Sync {
    async fn create_project(&self, input: &Value) -> ActionResult<CreatedProject>;

    async fn update_project(&self, id: &str, input: &Value) -> ActionResult<()>;

    async fn delete_project(&self, id: &str) -> ActionResult<()>;
}

/// Mutations bound to one request's session
#[derive(Clone)]
pub struct ProjectActions {
    service: ProjectService,
    principal: Option<Principal>,
}

impl ProjectActions {
    pub fn new(service: ProjectService, principal: Option<Principal>) -> Self {
        Self { service, principal }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

#[async_trait]
impl ProjectMutations for ProjectActions {
    async fn create_project(&self, input: &Value) -> ActionResult<CreatedProject> {
        let result = self.service.create(self.principal(), input).await;
        ActionResult::from_result(result, Operation::Create)
            .map(|project| CreatedProject { id: project.id })
            .with_status(StatusCode::CREATED)
    }

    async fn update_project(&self, id: &str, input: &Value) -> ActionResult<()> {
        let result = self.service.update(self.principal(), id, input).await;
        ActionResult::from_result(result, Operation::Update).map(|_| ())
    }

    async fn delete_project(&self, id: &str) -> ActionResult<()> {
        let result = self.service.delete(self.principal(), id).await;
        ActionResult::from_result(result, Operation::Delete)
    }
}
