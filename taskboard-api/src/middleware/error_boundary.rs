/// Outermost fault boundary
///
/// Any response flagged with an [`UnhandledFault`] is logged and its body is
/// replaced with a [`FaultResponse`]:
///
/// ```json
/// {
///   "error": "A database error occurred",
///   "path": "/api/tasks",
///   "time": "2025-01-10T12:00:00Z"
/// }
/// ```
///
/// Faults are raised by `ApiError::InternalError` and by [`panic_response`],
/// which `CatchPanicLayer` calls when a handler panics. Every other response
/// passes through untouched.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use utoipa::ToSchema;

/// Message shown to clients when a handler panics
pub const PANIC_MESSAGE: &str = "An unexpected error occurred";

/// Marker placed in response extensions by failing handlers
#[derive(Debug, Clone)]
pub struct UnhandledFault {
    pub message: String,
}

/// Body of every 500 response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FaultResponse {
    /// Client-safe error message
    pub error: String,

    /// Request path that failed
    pub path: String,

    /// When the fault was handled (UTC)
    pub time: DateTime<Utc>,
}

/// Middleware function for `axum::middleware::from_fn`
pub async fn error_boundary(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let Some(fault) = response.extensions().get::<UnhandledFault>() else {
        return response;
    };

    tracing::error!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        error = %fault.message,
        "Unhandled error"
    );

    let body = FaultResponse {
        error: fault.message.clone(),
        path,
        time: Utc::now(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Panic handler for `CatchPanicLayer::custom`
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(UnhandledFault {
        message: PANIC_MESSAGE.to_string(),
    });
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use tower::Service as _;
    use tower_http::catch_panic::CatchPanicLayer;

    use crate::error::ApiError;

    async fn explode() -> &'static str {
        panic!("kaboom")
    }

    fn router() -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/fail",
                get(|| async { ApiError::InternalError("Something broke".to_string()) }),
            )
            .route("/missing", get(|| async { ApiError::NotFound }))
            .route("/panic", get(explode))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(axum::middleware::from_fn(error_boundary))
    }

    async fn get_path(path: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = router().call(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_passes_through_success() {
        let (status, body) = get_path("/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"fine");
    }

    #[tokio::test]
    async fn test_passes_through_client_errors() {
        let (status, body) = get_path("/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_internal_error_body() {
        let (status, body) = get_path("/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let fault: FaultResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(fault.error, "Something broke");
        assert_eq!(fault.path, "/fail");
        assert!(fault.time <= Utc::now());
    }

    #[tokio::test]
    async fn test_panic_becomes_fault_body() {
        let (status, body) = get_path("/panic").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let fault: FaultResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(fault.error, PANIC_MESSAGE);
        assert_eq!(fault.path, "/panic");
    }
}
