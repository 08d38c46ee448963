/// User model and payload shapes
///
/// Users are the actors tasks get assigned to. A user's task list is derived
/// from `tasks.assigned_user_id` and never stored on the user row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(255)
/// );
/// ```
///
/// # Example
///
/// ```
/// use taskboard_shared::models::user::NewUser;
/// use validator::Validate;
///
/// let new_user = NewUser {
///     name: "Ada Lovelace".to_string(),
///     email: Some("ada@example.com".to_string()),
/// };
/// assert!(new_user.validate().is_ok());
/// ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::task::{not_blank, Task};

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-generated user ID
    pub id: i32,

    /// Display name
    pub name: String,

    /// Optional contact email
    pub email: Option<String>,

    /// Tasks assigned to this user
    ///
    /// Empty unless the read asked for related data.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl User {
    /// Reduces the user to the summary attached to tasks
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// User as embedded in a task's `assignedUser`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name (required)
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    /// Optional email address
    #[validate(email(message = "Invalid email format"))]
    #[serde(default)]
    pub email: Option<String>,
}

/// Full replacement payload for a user
///
/// `id` must match the ID in the request path. An omitted email is cleared.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    /// User ID (must equal the path ID)
    pub id: i32,

    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[serde(default)]
    pub email: Option<String>,
}
