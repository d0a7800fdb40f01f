use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::database::models::project::{Project, ProjectStatus};
use crate::services::ProjectMutations;
use crate::validation::validate_project;

/// Raw values of the create/edit form, as typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFormData {
    pub name: String,
    pub description: String,
    pub status: String,
    pub is_public: bool,
}

impl Default for ProjectFormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status: ProjectStatus::Planned.as_str().to_string(),
            is_public: false,
        }
    }
}

impl From<&Project> for ProjectFormData {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            status: project.status.as_str().to_string(),
            is_public: project.is_public,
        }
    }
}

impl ProjectFormData {
    pub fn to_input(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent
    Invalid,
    /// Saved; the list should be refreshed
    Saved,
    Failed(String),
}

/// Form state for creating or editing one project
#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub data: ProjectFormData,
    editing: Option<Uuid>,
    errors: BTreeMap<String, String>,
    last_error: Option<String>,
}

impl ProjectForm {
    pub fn for_create() -> Self {
        Self::default()
    }

    pub fn for_edit(project: &Project) -> Self {
        Self {
            data: ProjectFormData::from(project),
            editing: Some(project.id),
            ..Self::default()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Per-field messages from the last `validate`
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Check every field; returns true when the form may be submitted
    pub fn validate(&mut self) -> bool {
        match validate_project(&self.data.to_input()) {
            Ok(_) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors.field_map();
                false
            }
        }
    }

    pub async fn submit(&mut self, actions: &dyn ProjectMutations) -> SubmitOutcome {
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }

        let input = self.data.to_input();
        let error = match self.editing {
            Some(id) => actions.update_project(&id.to_string(), &input).await.error().map(str::to_string),
            None => actions.create_project(&input).await.error().map(str::to_string),
        };

        match error {
            None => {
                self.last_error = None;
                SubmitOutcome::Saved
            }
            Some(error) => {
                self.last_error = Some(error.clone());
                SubmitOutcome::Failed(error)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    #[default]
    Closed,
    Creating,
    Editing(Project),
}

/// Create/edit dialog. Opening resets the form; a successful submit closes it.
#[derive(Debug, Default)]
pub struct ProjectModal {
    state: ModalState,
    form: ProjectForm,
}

impl ProjectModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn editing(&self) -> Option<&Project> {
        match &self.state {
            ModalState::Editing(project) => Some(project),
            _ => None,
        }
    }

    pub fn form(&self) -> &ProjectForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProjectForm {
        &mut self.form
    }

    pub fn open_create(&mut self) {
        self.state = ModalState::Creating;
        self.form = ProjectForm::for_create();
    }

    pub fn open_edit(&mut self, project: Project) {
        self.form = ProjectForm::for_edit(&project);
        self.state = ModalState::Editing(project);
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
        self.form = ProjectForm::default();
    }

    pub async fn submit(&mut self, actions: &dyn ProjectMutations) -> SubmitOutcome {
        if !self.is_open() {
            return SubmitOutcome::Invalid;
        }
        let outcome = self.form.submit(actions).await;
        if outcome == SubmitOutcome::Saved {
            self.close();
        }
        outcome
    }
}
