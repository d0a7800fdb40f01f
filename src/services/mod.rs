pub mod actions;
pub mod project_queries;
pub mod project_service;

pub use actions::{CreatedProject, ProjectActions, ProjectMutations};
pub use project_queries::ProjectQueries;
pub use project_service::ProjectService;
