use axum::{
    extract::{Path, State},
    http::HeaderMap,
};

use crate::api::ProjectView;
use crate::middleware::ActionResult;
use crate::state::SharedState;
use crate::types::Operation;

/// GET /projects - every public project
pub async fn public_list(State(state): State<SharedState>, headers: HeaderMap) -> ActionResult<Vec<ProjectView>> {
    let viewer = state.principal(&headers);
    let result = state.queries.list_public().await;
    ActionResult::from_result(result, Operation::Load)
        .map(|projects| ProjectView::list(projects, viewer.as_ref().map(|p| p.email.as_str())))
}

/// GET /projects/:id - public projects, or private ones to their owner
pub async fn public_detail(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ActionResult<ProjectView> {
    let viewer = state.principal(&headers);
    let result = state.queries.detail(&id, viewer.as_ref()).await;
    ActionResult::from_result(result, Operation::Load)
        .map(|project| ProjectView::new(project, viewer.as_ref().map(|p| p.email.as_str())))
}
