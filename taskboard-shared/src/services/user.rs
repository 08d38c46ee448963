/// User service
///
/// Mirrors `TaskService` for users. Reads load each user's assigned tasks.

use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{StoreError, StoreResult};
use crate::models::user::{NewUser, User, UserPayload};
use crate::models::Fetch;
use crate::repository::{ensure_same_id, UserRepository};

/// Domain façade over the user repository
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Lists all users with their tasks
    pub async fn list_all(&self) -> StoreResult<Vec<User>> {
        info!("Fetching all users");
        self.repo.list(Fetch::WithRelated).await
    }

    /// Gets a user with their tasks, or `None` if it does not exist
    pub async fn get_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        self.repo.find_by_id(id, Fetch::WithRelated).await
    }

    /// Creates a user
    pub async fn create(&self, data: NewUser) -> StoreResult<User> {
        data.validate()?;

        let user = self.repo.create(data).await?;
        info!(user_id = user.id, name = %user.name, "User created");
        Ok(user)
    }

    /// Replaces a user's name and email
    ///
    /// # Errors
    ///
    /// - [`StoreError::IdMismatch`] if `id` differs from `data.id`
    /// - [`StoreError::Invalid`] if the payload fails validation
    /// - [`StoreError::NotFound`] if no user has this ID
    pub async fn update(&self, id: i32, data: UserPayload) -> StoreResult<User> {
        ensure_same_id(id, data.id)?;
        data.validate()?;

        let user = self.repo.update(id, data).await?;
        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Deletes a user, unassigning their tasks
    ///
    /// Returns `true` if the user existed and was removed.
    pub async fn delete(&self, id: i32) -> StoreResult<bool> {
        match self.repo.delete(id).await {
            Ok(user) => {
                warn!(user_id = id, name = %user.name, "User deleted");
                Ok(true)
            }
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryStore::new()))
    }

    fn new_user(name: &str, email: Option<&str>) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let user = service
            .create(new_user("Ada", Some("ada@example.com")))
            .await
            .unwrap();

        let found = service.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Ada");
        assert_eq!(found.email.as_deref(), Some("ada@example.com"));
        assert!(found.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let service = service();
        let err = service
            .create(new_user("Ada", Some("nope")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_update_clears_email() {
        let service = service();
        let user = service
            .create(new_user("Ada", Some("ada@example.com")))
            .await
            .unwrap();

        let updated = service
            .update(
                user.id,
                UserPayload {
                    id: user.id,
                    name: "Ada L.".to_string(),
                    email: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada L.");
        assert!(updated.email.is_none());
    }

    #[tokio::test]
    async fn test_update_id_mismatch() {
        let service = service();
        let user = service.create(new_user("Ada", None)).await.unwrap();

        let err = service
            .update(
                user.id,
                UserPayload {
                    id: user.id + 10,
                    name: "Other".to_string(),
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IdMismatch { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let service = service();
        assert!(!service.delete(77).await.unwrap());
    }
}
