/// Task model and payload shapes
///
/// Tasks are the core entity of Taskboard. A task may be assigned to at most
/// one user; the assignment is a nullable foreign key into `users`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     status VARCHAR(20) NOT NULL DEFAULT 'Open'
///         CHECK (status IN ('Open', 'InProgress', 'Completed')),
///     priority VARCHAR(20) NOT NULL DEFAULT 'Medium'
///         CHECK (priority IN ('Low', 'Medium', 'High')),
///     due_date TIMESTAMPTZ,
///     assigned_user_id INTEGER REFERENCES users(id) ON DELETE SET NULL
/// );
/// ```
///
/// # Payload shapes
///
/// - [`NewTask`]: the creatable fields. Status always starts `Open` and a new
///   task is never assigned.
/// - [`TaskPayload`]: a full replacement used by updates. Every mutable field
///   is overwritten; optional fields left out of the JSON are cleared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::user::UserSummary;
use super::UnknownVariant;

/// Task workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Open,

    /// Someone is working on it
    #[serde(alias = "In Progress")]
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(TaskStatus::Open),
            "InProgress" | "In Progress" => Ok(TaskStatus::InProgress),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Converts priority to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(TaskPriority::Low),
            "Medium" => Ok(TaskPriority::Medium),
            "High" => Ok(TaskPriority::High),
            other => Err(UnknownVariant {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-generated task ID
    pub id: i32,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date (UTC)
    pub due_date: Option<DateTime<Utc>>,

    /// ID of the assigned user, if any
    pub assigned_user_id: Option<i32>,

    /// The assigned user, present when the read asked for related data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<UserSummary>,
}

impl Task {
    /// Returns a copy of the task without its related user attached
    pub fn without_related(mut self) -> Self {
        self.assigned_user = None;
        self
    }
}

/// Creatable fields for a new task
///
/// Only title, description, priority and due date can be chosen by the
/// client. Any other field in the request body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "title": "Fix Swagger UI",
    "description": "Improve the documentation and theme of the API",
    "priority": "High",
    "dueDate": "2025-01-10T12:00:00Z"
}))]
pub struct NewTask {
    /// Task title (required)
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Priority (defaults to Medium)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Full replacement payload for a task
///
/// `id` must match the ID in the request path. Status and priority fall back
/// to their defaults when omitted; description, due date and assignment are
/// cleared when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Task ID (must equal the path ID)
    pub id: i32,

    /// Task title
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    /// Description (null clears it)
    #[serde(default)]
    pub description: Option<String>,

    /// Status (defaults to Open)
    #[serde(default)]
    pub status: TaskStatus,

    /// Priority (defaults to Medium)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Due date (null clears it)
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    /// Assigned user ID (null unassigns)
    #[serde(default)]
    pub assigned_user_id: Option<i32>,
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Open.as_str(), "Open");
        assert_eq!(TaskStatus::InProgress.as_str(), "InProgress");
        assert_eq!(TaskStatus::Completed.as_str(), "Completed");
    }

    #[test]
    fn test_task_status_parse_accepts_legacy_spelling() {
        assert_eq!("In Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("InProgress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("Blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_priority_parse() {
        assert_eq!("High".parse::<TaskPriority>(), Ok(TaskPriority::High));
        let err = "urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.kind, "priority");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Open);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_new_task_defaults_priority() {
        let new_task: NewTask = serde_json::from_value(json!({ "title": "Write docs" })).unwrap();
        assert_eq!(new_task.priority, TaskPriority::Medium);
        assert!(new_task.description.is_none());
        assert!(new_task.due_date.is_none());
    }

    #[test]
    fn test_new_task_ignores_server_assigned_fields() {
        let new_task: NewTask = serde_json::from_value(json!({
            "id": 99,
            "title": "Write docs",
            "status": "Completed",
            "assignedUserId": 4
        }))
        .unwrap();
        assert_eq!(new_task.title, "Write docs");
    }

    #[test]
    fn test_new_task_requires_title() {
        let result = serde_json::from_value::<NewTask>(json!({ "priority": "Low" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let result = serde_json::from_value::<TaskPayload>(json!({
            "id": 1,
            "title": "x",
            "status": "Blocked"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_accepts_legacy_status() {
        let payload: TaskPayload = serde_json::from_value(json!({
            "id": 1,
            "title": "x",
            "status": "In Progress"
        }))
        .unwrap();
        assert_eq!(payload.status, TaskStatus::InProgress);
        assert_eq!(payload.priority, TaskPriority::Medium);
        assert!(payload.assigned_user_id.is_none());
    }

    #[test]
    fn test_blank_title_fails_validation() {
        let new_task = NewTask {
            title: "   ".to_string(),
            description: None,
            priority: TaskPriority::Low,
            due_date: None,
        };
        let errors = new_task.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: 7,
            title: "Ship it".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: None,
            assigned_user_id: Some(3),
            assigned_user: None,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["assignedUserId"], 3);
        assert_eq!(value["status"], "InProgress");
        assert!(value.get("assignedUser").is_none());
    }
}
