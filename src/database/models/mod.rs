pub mod project;

pub use project::{Project, ProjectFields, ProjectFilter, ProjectStatus};
