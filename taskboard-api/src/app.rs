/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::postgres(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::error_boundary, openapi, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::repository::{PgStore, StoreHealth, TaskRepository, UserRepository};
use taskboard_shared::services::{TaskService, UserService};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Every field is reference-counted, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Task service
    pub tasks: TaskService,

    /// User service
    pub users: UserService,

    /// Store liveness probe for `/health`
    pub health: Arc<dyn StoreHealth>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state backed by any store implementing the repository traits
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: TaskRepository + UserRepository + StoreHealth + 'static,
    {
        Self {
            tasks: TaskService::new(store.clone()),
            users: UserService::new(store.clone()),
            health: store,
            config: Arc::new(config),
        }
    }

    /// Creates state backed by PostgreSQL
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self::new(Arc::new(PgStore::new(pool)), config)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET /health
/// ├── /api/tasks            GET, POST
/// ├── /api/tasks/:id        GET, PUT, DELETE
/// ├── /api/v2/tasks         GET, POST      (same handlers)
/// ├── /api/v2/tasks/:id     DELETE         (same handler)
/// ├── /api/users            GET, POST
/// ├── /api/users/:id        GET, PUT, DELETE
/// └── /swagger-ui           development only
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. CORS (tower-http CorsLayer)
/// 2. Request logging (tower-http TraceLayer: method, path, status, latency)
/// 3. Error boundary (JSON 500 body)
/// 4. Panic capture (tower-http CatchPanicLayer)
pub fn build_router(state: AppState) -> Router {
    let task_routes = Router::new()
        .route(
            "/api/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/api/v2/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/api/v2/tasks/:id", delete(routes::tasks::delete_task));

    let user_routes = Router::new()
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/api/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let mut router = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(task_routes)
        .merge(user_routes);

    if state.config.api.environment.is_development() {
        router = router.merge(openapi::swagger_ui());
    }

    router
        .layer(CatchPanicLayer::custom(error_boundary::panic_response))
        .layer(axum::middleware::from_fn(error_boundary::error_boundary))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// CORS policy from the configured origins
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION])
        .max_age(std::time::Duration::from_secs(3600))
}
