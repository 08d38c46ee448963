/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; `ApiError` converts to the matching HTTP
/// response. Store errors convert with `?`.
///
/// | Variant | Status | Body |
/// |---|---|---|
/// | `NotFound` | 404 | empty |
/// | `BadRequest` | 400 | `ErrorResponse` |
/// | `ValidationError` | 400 | `ErrorResponse` with `details` |
/// | `InternalError` | 500 | written by the error boundary |
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler(found: Option<u32>) -> ApiResult<Json<u32>> {
///     found.map(Json).ok_or(ApiError::NotFound)
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::error::StoreError;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::middleware::error_boundary::UnhandledFault;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound,

    /// Field validation failed (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    ///
    /// The message is shown to the client, so it must not carry internal
    /// detail.
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format for 400 responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code (`bad_request` or `validation_error`)
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (error_code, message, details) = match self {
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::InternalError(message) => {
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                response.extensions_mut().insert(UnhandledFault { message });
                return response;
            }
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Flattens validator output into one detail per failed rule
pub fn validation_details(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound,
            StoreError::IdMismatch { path_id, payload_id } => ApiError::BadRequest(format!(
                "Path id {} does not match payload id {}",
                path_id, payload_id
            )),
            StoreError::UnknownUser(user_id) => {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "assignedUserId".to_string(),
                    message: format!("User {} does not exist", user_id),
                }])
            }
            StoreError::Invalid(errors) => ApiError::ValidationError(validation_details(&errors)),
            StoreError::Corrupt(detail) => {
                tracing::error!(detail = %detail, "Stored row could not be decoded");
                ApiError::InternalError("Stored data could not be read".to_string())
            }
            StoreError::Database(db_err) => {
                tracing::error!(error = %db_err, "Database error");
                ApiError::InternalError("A database error occurred".to_string())
            }
        }
    }
}

/// Convert JSON body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
