//! Declarative input rules for the project form, the login form and project ids.
//!
//! Validators take untyped JSON and return either a normalized, strongly-typed
//! record or a [`ValidationErrors`] list in field order. The write path reports
//! only [`ValidationErrors::first_message`]; form state uses
//! [`ValidationErrors::field_map`] to show every field at once.

pub mod login;
pub mod project;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub use login::{validate_email, validate_login, LoginInput};
pub use project::{validate_project, validate_project_id, INVALID_FORM_DATA};

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Violations in the order the fields were checked (at most one per field)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    issues: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push(FieldError { field, message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldError] {
        &self.issues
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.issues.first()
    }

    pub fn first_message(&self) -> &str {
        self.first().map(|issue| issue.message.as_str()).unwrap_or("Invalid input")
    }

    /// Field name to message, for per-field display
    pub fn field_map(&self) -> BTreeMap<String, String> {
        self.issues
            .iter()
            .map(|issue| (issue.field.to_string(), issue.message.clone()))
            .collect()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Ok when nothing was recorded
    pub(crate) fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first_message())
    }
}

impl std::error::Error for ValidationErrors {}
