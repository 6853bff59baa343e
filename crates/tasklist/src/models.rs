//! Task data shapes: wire DTOs and the normalized local form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet
    Pending,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
}

impl TaskStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire value of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// Human label, used when the server omits `statusDescription`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "complete" | "done" => Ok(Self::Completed),
            other => {
                let expected: Vec<String> = Self::ALL
                    .iter()
                    .map(|s| s.as_str().to_ascii_lowercase())
                    .collect();
                Err(format!(
                    "Invalid status '{other}'. Expected one of: {}",
                    expected.join(", ")
                ))
            }
        }
    }
}

/// A task as the server sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub status_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A task as the store keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier.
    pub id: String,
    pub title: String,
    /// `None` when the server sent nothing or only whitespace.
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Server label, or [`TaskStatus::label`] when absent.
    pub status_description: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<TaskResponse> for Task {
    fn from(response: TaskResponse) -> Self {
        let status_description = response
            .status_description
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| response.status.label().to_string());

        Self {
            id: response.id,
            title: response.title,
            description: response.description.filter(|d| !d.trim().is_empty()),
            status: response.status,
            status_description,
            created_at: response.created_at,
            updated_at: response.updated_at,
        }
    }
}

/// Body of `POST /api/v1/tasks`.
///
/// `description` is always serialized, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
}

impl CreateTaskRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    /// Trim the title and description; an empty description becomes `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: normalize_description(self.description.as_deref()),
        }
    }
}

/// Body of `PUT /api/v1/tasks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Trim the title when present and normalize the description the same
    /// way as [`CreateTaskRequest::normalized`]. Status is left untouched.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            description: normalize_description(self.description.as_deref()),
            status: self.status,
        }
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    let trimmed = description.unwrap_or_default().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("IN_PROGRESS")
        );
        let status: TaskStatus = serde_json::from_value(json!("COMPLETED")).unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("DONE".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_minimal_response_normalizes() {
        let response: TaskResponse =
            serde_json::from_value(json!({ "id": "1", "title": "A", "status": "PENDING" }))
                .unwrap();
        let task = Task::from(response);

        assert_eq!(task.id, "1");
        assert_eq!(task.description, None);
        assert_eq!(task.status_description, "Pending");
        assert_eq!(task.created_at, None);
    }

    #[test]
    fn test_full_response_keeps_server_values() {
        let response: TaskResponse = serde_json::from_value(json!({
            "id": "7",
            "title": "Write report",
            "description": "   ",
            "status": "IN_PROGRESS",
            "statusDescription": "Em Progresso",
            "createdAt": "2024-05-01T10:00:00",
            "updatedAt": "2024-05-02T11:30:00",
            "owner": "ignored"
        }))
        .unwrap();
        let task = Task::from(response);

        assert_eq!(task.description, None);
        assert_eq!(task.status_description, "Em Progresso");
        assert_eq!(task.updated_at.as_deref(), Some("2024-05-02T11:30:00"));
    }

    #[test]
    fn test_create_request_normalization() {
        let req = CreateTaskRequest::new(" Buy milk ", Some(String::new())).normalized();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "title": "Buy milk", "description": null })
        );

        let req = CreateTaskRequest::new("Call", Some("  two lines \n".to_string())).normalized();
        assert_eq!(req.description.as_deref(), Some("two lines"));
    }

    #[test]
    fn test_update_request_serialization() {
        let req = UpdateTaskRequest::default()
            .with_status(TaskStatus::Completed)
            .normalized();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "description": null, "status": "COMPLETED" })
        );

        let req = UpdateTaskRequest::default()
            .with_title("  Renamed ")
            .with_description(" notes ")
            .normalized();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "title": "Renamed", "description": "notes" })
        );
    }

    #[test]
    fn test_normalization_edge_inputs() {
        let cases: [(&str, Option<&str>, &str, Option<&str>); 6] = [
            ("   ", Some("   "), "", None),
            ("\tTitle\n", Some("\t\n"), "Title", None),
            ("Title", Some("notes"), "Title", Some("notes")),
            (" Title ", None, "Title", None),
            ("\n", Some(" a b \t"), "", Some("a b")),
            ("Title", Some(""), "Title", None),
        ];

        for (title, description, want_title, want_description) in cases {
            let create =
                CreateTaskRequest::new(title, description.map(str::to_string)).normalized();
            assert_eq!(create.title, want_title, "create title for {title:?}");
            assert_eq!(create.description.as_deref(), want_description);

            let mut update = UpdateTaskRequest::default().with_title(title);
            update.description = description.map(str::to_string);
            let update = update.normalized();
            assert_eq!(update.title.as_deref(), Some(want_title), "update title for {title:?}");
            assert_eq!(update.description.as_deref(), want_description);
        }
    }

    #[test]
    fn test_invalid_status_lists_every_status() {
        let err = "archived".parse::<TaskStatus>().unwrap_err();
        for status in TaskStatus::ALL {
            assert!(err.contains(&status.as_str().to_ascii_lowercase()), "{err}");
        }
    }
}
