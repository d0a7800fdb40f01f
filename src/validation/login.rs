use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ValidationErrors;

// Local part may not start with a dot or contain "..", checked separately
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$").expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
}

/// Validate the login form. Accepts `{ "email": "..." }`.
pub fn validate_login(input: &Value) -> Result<LoginInput, ValidationErrors> {
    let email = match input.get("email") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => return Err(ValidationErrors::single("email", "Email must be a string")),
    };
    validate_email(email).map(|email| LoginInput { email })
}

/// Trim, lower-case and check the shape of an email address
pub fn validate_email(raw: Option<&str>) -> Result<String, ValidationErrors> {
    let email = raw.unwrap_or_default().trim().to_lowercase();

    let mut errors = ValidationErrors::new();
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !is_valid_email(&email) {
        errors.push("email", "Please enter a valid email address");
    }
    errors.into_result(|| email)
}

fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}
