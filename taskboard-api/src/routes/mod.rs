/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `tasks`: Task CRUD endpoints (`/api/tasks`, plus the `/api/v2/tasks` aliases)
/// - `users`: User CRUD endpoints (`/api/users`)

pub mod health;
pub mod tasks;
pub mod users;
