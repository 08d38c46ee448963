//! # Taskboard API Server Library
//!
//! HTTP surface of Taskboard: task and user CRUD endpoints, health check,
//! and generated API documentation.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors
//! - `middleware`: Error boundary
//! - `openapi`: OpenAPI document and Swagger UI
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod openapi;
pub mod routes;
