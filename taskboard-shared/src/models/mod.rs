/// Domain models for Taskboard
///
/// This module contains the entity types stored in the database and the
/// payload shapes clients send to create or replace them.
///
/// # Models
///
/// - `task`: Trackable units of work with status, priority and an optional assignee
/// - `user`: Actors that tasks can be assigned to
///
/// # Example
///
/// ```
/// use taskboard_shared::models::task::{NewTask, TaskPriority};
///
/// let new_task = NewTask {
///     title: "Write release notes".to_string(),
///     description: None,
///     priority: TaskPriority::High,
///     due_date: None,
/// };
/// assert_eq!(new_task.priority.as_str(), "High");
/// ```

pub mod task;
pub mod user;

/// Eager-load selector for read operations
///
/// Every read through the data-access layer states whether it wants the
/// related entity attached: a task's assigned user, or a user's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// Only the entity's own columns
    Shallow,

    /// The entity plus its related records
    WithRelated,
}

impl Fetch {
    /// Whether related records should be loaded
    pub fn includes_related(&self) -> bool {
        matches!(self, Fetch::WithRelated)
    }
}

/// Error returned when a stored or submitted enumeration value is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {kind} value: {value:?}")]
pub struct UnknownVariant {
    /// Name of the enumeration (e.g. "status")
    pub kind: &'static str,

    /// The rejected value
    pub value: String,
}
