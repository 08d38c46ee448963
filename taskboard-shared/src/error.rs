/// Error types for the data-access and service layers
///
/// Repositories and services return `StoreError`. The API crate maps each
/// variant to an HTTP status; nothing in this crate knows about HTTP.

use validator::ValidationErrors;

/// Errors raised by repositories and services
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row with the requested ID exists
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// The ID in the request path differs from the ID in the payload
    #[error("path id {path_id} does not match payload id {payload_id}")]
    IdMismatch { path_id: i32, payload_id: i32 },

    /// A task references a user that does not exist
    #[error("user {0} does not exist")]
    UnknownUser(i32),

    /// Payload failed field validation
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),

    /// A stored row could not be mapped back to a model
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether this error means the requested row does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result alias for repository and service operations
pub type StoreResult<T> = Result<T, StoreError>;
