/// OpenAPI document
///
/// Generated from the `#[utoipa::path]` annotations on the handlers.
/// `build_router` mounts Swagger UI in development only:
///
/// - `/swagger-ui` - interactive documentation
/// - `/api-docs/openapi.json` - the raw document

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::{ErrorResponse, ValidationErrorDetail};
use crate::middleware::error_boundary::FaultResponse;
use crate::routes::{health, tasks, users};

/// Path of the raw OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TaskBoard API",
        description = "Track tasks and the users they are assigned to"
    ),
    paths(
        health::health_check,
        tasks::list_tasks,
        tasks::get_task,
        tasks::create_task,
        tasks::update_task,
        tasks::delete_task,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(schemas(ErrorResponse, ValidationErrorDetail, FaultResponse)),
    tags(
        (name = "health", description = "Liveness"),
        (name = "tasks", description = "Task management"),
        (name = "users", description = "User management"),
    )
)]
pub struct ApiDoc;

/// Swagger UI serving [`ApiDoc`]
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}
