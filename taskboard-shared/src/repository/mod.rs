/// Data-access layer
///
/// Repositories map models to and from the persistence store. Each entity has
/// one trait; `PgStore` implements all of them over a PostgreSQL pool.
///
/// # Contract
///
/// - `list` returns rows ordered by ID (insertion order).
/// - `find_by_id` returns `None` when the row does not exist.
/// - `create` returns the stored row including its generated ID.
/// - `update` fails with [`StoreError::IdMismatch`] when the path ID and the
///   payload ID differ, and with [`StoreError::NotFound`] when no row matches.
///   All mutable fields are overwritten.
/// - `delete` returns the removed row, or [`StoreError::NotFound`].
///
/// Reads take a [`Fetch`] selector so callers state whether related rows are
/// loaded.
///
/// # Modules
///
/// - `postgres`: `PgStore`, the sqlx implementation
/// - `memory`: `MemoryStore`, an in-memory implementation for tests
///   (enabled with the `test-utils` feature)
///
/// [`StoreError::IdMismatch`]: crate::error::StoreError::IdMismatch
/// [`StoreError::NotFound`]: crate::error::StoreError::NotFound

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::models::task::{NewTask, Task, TaskPayload};
use crate::models::user::{NewUser, User, UserPayload};
use crate::models::Fetch;

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use postgres::PgStore;

/// Task persistence operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists all tasks in insertion order
    async fn list(&self, fetch: Fetch) -> StoreResult<Vec<Task>>;

    /// Finds a task by ID
    async fn find_by_id(&self, id: i32, fetch: Fetch) -> StoreResult<Option<Task>>;

    /// Inserts a new task with status `Open` and no assignee
    async fn create(&self, data: NewTask) -> StoreResult<Task>;

    /// Replaces every mutable field of an existing task
    async fn update(&self, id: i32, data: TaskPayload) -> StoreResult<Task>;

    /// Deletes a task, returning the removed row
    async fn delete(&self, id: i32) -> StoreResult<Task>;
}

/// User persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lists all users in insertion order
    async fn list(&self, fetch: Fetch) -> StoreResult<Vec<User>>;

    /// Finds a user by ID
    async fn find_by_id(&self, id: i32, fetch: Fetch) -> StoreResult<Option<User>>;

    /// Inserts a new user
    async fn create(&self, data: NewUser) -> StoreResult<User>;

    /// Replaces every mutable field of an existing user
    async fn update(&self, id: i32, data: UserPayload) -> StoreResult<User>;

    /// Deletes a user, returning the removed row
    ///
    /// Tasks assigned to the user are left in place, unassigned.
    async fn delete(&self, id: i32) -> StoreResult<User>;
}

/// Liveness probe for the persistence store
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Checks that the store answers a trivial query
    async fn ping(&self) -> StoreResult<()>;
}

/// Rejects an update whose payload ID differs from the path ID
pub(crate) fn ensure_same_id(path_id: i32, payload_id: i32) -> StoreResult<()> {
    if path_id != payload_id {
        return Err(StoreError::IdMismatch {
            path_id,
            payload_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_same_id() {
        assert!(ensure_same_id(3, 3).is_ok());
        assert!(matches!(
            ensure_same_id(3, 4),
            Err(StoreError::IdMismatch {
                path_id: 3,
                payload_id: 4
            })
        ));
    }
}
