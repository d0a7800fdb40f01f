//! Client-side interaction state for the project pages: the filter bar,
//! the delete confirmation and the create/edit modal. None of these render
//! anything; they hold state and call the mutation entry points.

pub mod delete;
pub mod filters;
pub mod modal;

pub use delete::{DeleteFlow, DeleteOutcome};
pub use filters::FilterBar;
pub use modal::{ModalState, ProjectForm, ProjectFormData, ProjectModal, SubmitOutcome};
