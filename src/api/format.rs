use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::project::{Project, ProjectStatus};

const PLANNED_COLOR: &str = "bg-yellow-100 text-yellow-800 dark:bg-yellow-900/30 dark:text-yellow-400";
const ACTIVE_COLOR: &str = "bg-green-100 text-green-800 dark:bg-green-900/30 dark:text-green-400";
const DONE_COLOR: &str = "bg-blue-100 text-blue-800 dark:bg-blue-900/30 dark:text-blue-400";
const UNKNOWN_COLOR: &str = "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-400";

/// One entry of a status `<select>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Status choices in display order
pub fn status_options() -> Vec<StatusOption> {
    ProjectStatus::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

/// Badge classes for a raw status value; unknown values get a neutral badge
pub fn status_color(status: &str) -> &'static str {
    match status.parse::<ProjectStatus>() {
        Ok(ProjectStatus::Planned) => PLANNED_COLOR,
        Ok(ProjectStatus::Active) => ACTIVE_COLOR,
        Ok(ProjectStatus::Done) => DONE_COLOR,
        Err(_) => UNKNOWN_COLOR,
    }
}

/// "October 16, 2026"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// "10/16/2026 14:05:09"
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%m/%d/%Y %H:%M:%S").to_string()
}

/// A project plus the display fields a list or detail page needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub status_label: &'static str,
    pub status_color: &'static str,
    pub created_display: String,
    pub updated_display: String,
    pub is_owner: bool,
}

impl ProjectView {
    pub fn new(project: Project, viewer: Option<&str>) -> Self {
        Self {
            status_label: project.status.label(),
            status_color: status_color(project.status.as_str()),
            created_display: format_date(&project.created_at),
            updated_display: format_date_time(&project.updated_at),
            is_owner: viewer.is_some_and(|email| project.is_owned_by(email)),
            project,
        }
    }

    pub fn list(projects: Vec<Project>, viewer: Option<&str>) -> Vec<Self> {
        projects.into_iter().map(|project| Self::new(project, viewer)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn colors_by_status() {
        assert!(status_color("PLANNED").contains("yellow"));
        assert!(status_color("ACTIVE").contains("green"));
        assert!(status_color("DONE").contains("blue"));
        assert_eq!(status_color("ARCHIVED"), UNKNOWN_COLOR);
    }

    #[test]
    fn options_in_display_order() {
        let labels: Vec<_> = status_options().iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Planned", "Active", "Done"]);
        assert_eq!(status_options()[0].value, "PLANNED");
    }

    #[test]
    fn date_formats() {
        assert_eq!(format_date(&at(2026, 10, 6, 9, 0, 0)), "October 6, 2026");
        assert_eq!(format_date_time(&at(2026, 10, 16, 14, 5, 9)), "10/16/2026 14:05:09");
    }

    #[test]
    fn view_adds_display_fields_and_ownership() {
        let project = Project {
            id: Uuid::new_v4(),
            owner_email: "a@x.com".to_string(),
            name: "Alpha".to_string(),
            description: None,
            status: ProjectStatus::Active,
            is_public: true,
            created_at: at(2026, 1, 2, 3, 4, 5),
            updated_at: at(2026, 1, 3, 3, 4, 5),
        };

        let value = serde_json::to_value(ProjectView::new(project.clone(), Some("a@x.com"))).unwrap();
        assert_eq!(value["name"], "Alpha");
        assert_eq!(value["ownerEmail"], "a@x.com");
        assert_eq!(value["statusLabel"], "Active");
        assert_eq!(value["createdDisplay"], "January 2, 2026");
        assert_eq!(value["updatedDisplay"], "01/03/2026 03:04:05");
        assert_eq!(value["isOwner"], true);

        assert!(!ProjectView::new(project.clone(), Some("b@x.com")).is_owner);
        assert!(!ProjectView::new(project, None).is_owner);
    }
}
