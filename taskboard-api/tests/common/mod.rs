//! Common test utilities for the HTTP tests
//!
//! The router runs against `MemoryStore`, so these tests need neither a
//! database nor a network listener. Requests are driven through
//! `tower::Service::call`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::repository::memory::MemoryStore;
use tower::Service as _;

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: axum::Router,
    pub store: MemoryStore,
    pub config: Config,
}

/// Buffered response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parses the body as JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestContext {
    /// Creates a development-mode context with an empty store
    pub fn new() -> Self {
        Self::with_env("development")
    }

    /// Creates a context for the given `APP_ENV`
    pub fn with_env(app_env: &str) -> Self {
        let app_env = app_env.to_string();
        let config = Config::from_lookup(move |key| match key {
            "DATABASE_URL" => Some("postgresql://unused/taskboard_test".to_string()),
            "APP_ENV" => Some(app_env.clone()),
            _ => None,
        })
        .expect("test config");

        let store = MemoryStore::new();
        let state = AppState::new(std::sync::Arc::new(store.clone()), config.clone());

        Self {
            app: build_router(state),
            store,
            config,
        }
    }

    /// Sends a request with an optional JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    /// Sends a raw request
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a task through the API and returns its JSON
    pub async fn create_task(&self, title: &str) -> Value {
        let response = self
            .post("/api/tasks", serde_json::json!({ "title": title }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }

    /// Creates a user through the API and returns its JSON
    pub async fn create_user(&self, name: &str) -> Value {
        let response = self
            .post("/api/users", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }
}
