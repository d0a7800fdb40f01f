use serde_json::Value;

use super::ValidationErrors;
use crate::database::models::project::{ProjectFields, ProjectStatus};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Reported when the submitted body is not a form object at all
pub const INVALID_FORM_DATA: &str = "Invalid form data";

/// Validate raw project-form input into normalized fields.
///
/// Fields are checked in the order name, description, status, isPublic.
/// `name` is trimmed before its length is checked; an empty `description`
/// becomes `None`.
pub fn validate_project(input: &Value) -> Result<ProjectFields, ValidationErrors> {
    let Some(form) = input.as_object() else {
        return Err(ValidationErrors::single("form", INVALID_FORM_DATA));
    };

    let mut errors = ValidationErrors::new();
    let name = check_name(form.get("name"), &mut errors);
    let description = check_description(form.get("description"), &mut errors);
    let status = check_status(form.get("status"), &mut errors);
    let is_public = check_is_public(form.get("isPublic"), &mut errors);

    match (name, description, status, is_public) {
        (Some(name), Some(description), Some(status), Some(is_public)) if errors.is_empty() => Ok(ProjectFields {
            name,
            description,
            status,
            is_public,
        }),
        _ => Err(errors),
    }
}

/// A project id must be present; anything non-empty is passed on for lookup
pub fn validate_project_id(raw: &str) -> Result<&str, ValidationErrors> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ValidationErrors::single("id", "Project ID is required"));
    }
    Ok(id)
}

fn check_name(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.push("name", "Name is required");
            None
        }
        Some(Value::String(raw)) => {
            let name = raw.trim();
            let len = name.chars().count();
            if len < NAME_MIN_CHARS {
                errors.push("name", format!("Name must be at least {} characters", NAME_MIN_CHARS));
                None
            } else if len > NAME_MAX_CHARS {
                errors.push("name", format!("Name must be less than {} characters", NAME_MAX_CHARS));
                None
            } else {
                Some(name.to_string())
            }
        }
        Some(_) => {
            errors.push("name", "Name must be a string");
            None
        }
    }
}

/// Outer `Option` is validity, inner is the normalized value
fn check_description(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<Option<String>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(raw)) if raw.is_empty() => Some(None),
        Some(Value::String(raw)) => {
            if raw.chars().count() > DESCRIPTION_MAX_CHARS {
                errors.push(
                    "description",
                    format!("Description must be less than {} characters", DESCRIPTION_MAX_CHARS),
                );
                None
            } else {
                Some(Some(raw.clone()))
            }
        }
        Some(_) => {
            errors.push("description", "Description must be a string");
            None
        }
    }
}

fn check_status(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<ProjectStatus> {
    let received = match value {
        None | Some(Value::Null) => {
            errors.push("status", "Status is required");
            return None;
        }
        Some(Value::String(raw)) => match raw.parse::<ProjectStatus>() {
            Ok(status) => return Some(status),
            Err(_) => format!("'{}'", raw),
        },
        Some(other) => other.to_string(),
    };

    let expected = ProjectStatus::ALL
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(" | ");
    errors.push("status", format!("Invalid status. Expected {}, received {}", expected, received));
    None
}

fn check_is_public(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<bool> {
    match value {
        Some(Value::Bool(flag)) => Some(*flag),
        _ => {
            errors.push("isPublic", "isPublic must be a boolean");
            None
        }
    }
}
