/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Operations on projects
/// Used for logging and failure messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Load,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Load => "load",
        }
    }

    /// Generic message shown to users when the operation fails unexpectedly
    pub fn failure_message(&self) -> String {
        match self {
            Operation::Load => "Failed to load projects".to_string(),
            _ => format!("Failed to {} project", self.verb()),
        }
    }
}
