use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{status_options, ProjectView, StatusOption};
use crate::auth::Principal;
use crate::database::models::project::ProjectFilter;
use crate::middleware::ActionResult;
use crate::services::{CreatedProject, ProjectMutations};
use crate::state::SharedState;
use crate::types::Operation;

/// `?status=&search=` on the owner list. Both are optional; an unknown
/// status means "all".
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppliedFilters {
    pub status: String,
    pub search: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListing {
    pub projects: Vec<ProjectView>,
    pub filters: AppliedFilters,
    pub status_options: Vec<StatusOption>,
}

/// GET /app/projects
pub async fn list(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> ActionResult<ProjectListing> {
    let filter = ProjectFilter::from_query(params.status.as_deref(), params.search.as_deref());
    let result = state.queries.list_for_owner(Some(&principal), &filter).await;

    ActionResult::from_result(result, Operation::Load).map(|projects| ProjectListing {
        projects: ProjectView::list(projects, Some(&principal.email)),
        filters: AppliedFilters {
            status: filter.status.map(|s| s.as_str().to_string()).unwrap_or_else(|| "all".to_string()),
            search: filter.name_contains.unwrap_or_default(),
        },
        status_options: status_options(),
    })
}

/// POST /app/projects
pub async fn create(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<Value>, JsonRejection>,
) -> ActionResult<CreatedProject> {
    match body {
        Ok(Json(input)) => state.actions(Some(principal)).create_project(&input).await,
        Err(rejection) => ActionResult::invalid_body(rejection),
    }
}

/// PUT /app/projects/:id
pub async fn update(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ActionResult<()> {
    match body {
        Ok(Json(input)) => state.actions(Some(principal)).update_project(&id, &input).await,
        Err(rejection) => ActionResult::invalid_body(rejection),
    }
}

/// DELETE /app/projects/:id
pub async fn remove(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ActionResult<()> {
    state.actions(Some(principal)).delete_project(&id).await
}
