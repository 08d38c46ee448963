/// Request extractors
///
/// `ApiJson` behaves like `axum::Json` but rejects bad bodies with an
/// `ApiError::BadRequest`, so malformed JSON, missing required fields, and
/// unknown enum values all produce the standard 400 `ErrorResponse`.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::IntoResponse,
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::Service as _;

    #[derive(Deserialize)]
    struct Echo {
        name: String,
    }

    async fn echo(ApiJson(body): ApiJson<Echo>) -> impl IntoResponse {
        body.name
    }

    async fn send(body: &'static str) -> (StatusCode, serde_json::Value) {
        let mut app = Router::new().route("/", post(echo));
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let (status, _) = send(r#"{"name":"ok"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let (status, body) = send("{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("name"));
    }
}
