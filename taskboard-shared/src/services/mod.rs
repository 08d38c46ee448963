/// Service layer
///
/// Services sit between the HTTP handlers and the repositories. They validate
/// payloads, enforce the creatable-field policy, and log domain events.
///
/// - `task`: `TaskService`
/// - `user`: `UserService`

pub mod task;
pub mod user;

pub use task::TaskService;
pub use user::UserService;
