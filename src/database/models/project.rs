use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planned,
    Active,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown project status: {0}")]
pub struct UnknownStatus(pub String);

impl ProjectStatus {
    /// Every status in display order
    pub const ALL: [ProjectStatus; 3] = [ProjectStatus::Planned, ProjectStatus::Active, ProjectStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "PLANNED",
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::Done => "DONE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "Planned",
            ProjectStatus::Active => "Active",
            ProjectStatus::Done => "Done",
        }
    }

    /// Lenient parse used for query-string filters (`?status=active`)
    pub fn parse_loose(value: &str) -> Option<Self> {
        value.trim().to_ascii_uppercase().parse().ok()
    }
}

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(ProjectStatus::Planned),
            "ACTIVE" => Ok(ProjectStatus::Active),
            "DONE" => Ok(ProjectStatus::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub owner_email: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner_email == email
    }

    /// Detail-view visibility: public projects are visible to everyone,
    /// private ones only to their owner.
    pub fn is_visible_to(&self, viewer: Option<&str>) -> bool {
        self.is_public || viewer.is_some_and(|email| self.is_owned_by(email))
    }
}

/// Raw row as stored in the `projects` table
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub owner_email: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = UnknownStatus;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: row.status.parse()?,
            id: row.id,
            owner_email: row.owner_email,
            name: row.name,
            description: row.description,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Validated, normalized mutable fields of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFields {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub is_public: bool,
}

/// Narrowing applied to an owner's project list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub name_contains: Option<String>,
}

impl ProjectFilter {
    /// Build from raw query-string values. Unknown statuses and blank
    /// searches mean "no narrowing".
    pub fn from_query(status: Option<&str>, search: Option<&str>) -> Self {
        Self {
            status: status.and_then(ProjectStatus::parse_loose),
            name_contains: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        if let Some(status) = self.status {
            if project.status != status {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !project.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
