/// Task endpoints
///
/// Every handler goes through `TaskService`.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List tasks with their assigned users
/// - `GET /api/tasks/:id` - Get one task
/// - `POST /api/tasks` - Create a task from the creatable fields
/// - `PUT /api/tasks/:id` - Replace a task
/// - `DELETE /api/tasks/:id` - Delete a task
///
/// `GET /api/v2/tasks`, `POST /api/v2/tasks` and `DELETE /api/v2/tasks/:id`
/// are served by the same handlers. Created resources are always located
/// under `/api/tasks`.

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
use taskboard_shared::models::task::{NewTask, Task, TaskPayload};

/// List all tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "All tasks with their assigned users", body = [Task])
    ),
    tag = "tasks"
)]
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list_all().await?;
    Ok(Json(tasks))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "The task", body = Task),
        (status = 404, description = "No task with this ID")
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Task>> {
    state
        .tasks
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Create a task
///
/// Only title, description, priority and due date are read from the body.
/// The new task starts `Open` and unassigned.
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = Task,
            headers(("Location" = String, description = "URL of the new task"))),
        (status = 400, description = "Invalid body", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<NewTask>,
) -> ApiResult<impl IntoResponse> {
    let task = state.tasks.create(data).await?;
    let location = format!("/api/tasks/{}", task.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(task)))
}

/// Replace a task
///
/// The body's `id` must equal the path ID. All mutable fields are replaced;
/// optional fields left out are cleared.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = TaskPayload,
    responses(
        (status = 204, description = "Task updated"),
        (status = 400, description = "ID mismatch, invalid body, or unknown assignee", body = ErrorResponse),
        (status = 404, description = "No task with this ID")
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<TaskPayload>,
) -> ApiResult<StatusCode> {
    state.tasks.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "No task with this ID")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if state.tasks.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
