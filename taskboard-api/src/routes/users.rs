/// User endpoints
///
/// Same contract as the task endpoints, through `UserService`. Reads include
/// each user's assigned tasks. Deleting a user leaves their tasks in place,
/// unassigned.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ErrorResponse},
    extract::ApiJson,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use taskboard_shared::models::user::{NewUser, User, UserPayload};

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users with their tasks", body = [User])
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list_all().await?))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "No user with this ID")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<User>> {
    state
        .users
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Invalid body", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.create(data).await?;
    let location = format!("/api/users/{}", user.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

/// Replace a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserPayload,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "ID mismatch or invalid body", body = ErrorResponse),
        (status = 404, description = "No user with this ID")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<StatusCode> {
    state.users.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No user with this ID")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if state.users.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
