//! # Taskboard Shared Library
//!
//! Domain types, persistence, and business logic used by the Taskboard API
//! server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Task and user models, payload shapes
//! - `repository`: Data-access traits and the PostgreSQL implementation
//! - `services`: Task and user services used by the HTTP handlers
//! - `error`: Store error type

pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
