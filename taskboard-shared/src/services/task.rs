/// Task service
///
/// `TaskService` is the single path every task route goes through. It owns
/// the creatable-field policy (new tasks always start `Open` and unassigned),
/// payload validation, and the informational logging around task changes.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::models::task::{NewTask, TaskPriority};
/// use taskboard_shared::repository::PgStore;
/// use taskboard_shared::services::task::TaskService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let service = TaskService::new(Arc::new(PgStore::new(pool)));
///
/// let task = service
///     .create(NewTask {
///         title: "Plan sprint".to_string(),
///         description: None,
///         priority: TaskPriority::High,
///         due_date: None,
///     })
///     .await?;
///
/// assert!(service.delete(task.id).await?);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{StoreError, StoreResult};
use crate::models::task::{NewTask, Task, TaskPayload};
use crate::models::Fetch;
use crate::repository::{ensure_same_id, TaskRepository};

/// Domain façade over the task repository
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Lists all tasks with their assigned users
    pub async fn list_all(&self) -> StoreResult<Vec<Task>> {
        info!("Fetching all tasks");
        self.repo.list(Fetch::WithRelated).await
    }

    /// Gets a task with its assigned user, or `None` if it does not exist
    pub async fn get_by_id(&self, id: i32) -> StoreResult<Option<Task>> {
        self.repo.find_by_id(id, Fetch::WithRelated).await
    }

    /// Creates a task from the creatable fields
    ///
    /// # Errors
    ///
    /// - [`StoreError::Invalid`] if the title is empty or too long
    pub async fn create(&self, data: NewTask) -> StoreResult<Task> {
        data.validate()?;

        let task = self.repo.create(data).await?;
        info!(task_id = task.id, title = %task.title, "Task created");
        Ok(task)
    }

    /// Replaces a task's mutable fields
    ///
    /// # Errors
    ///
    /// - [`StoreError::IdMismatch`] if `id` differs from `data.id`
    /// - [`StoreError::Invalid`] if the payload fails validation
    /// - [`StoreError::UnknownUser`] if the assignee does not exist
    /// - [`StoreError::NotFound`] if no task has this ID
    pub async fn update(&self, id: i32, data: TaskPayload) -> StoreResult<Task> {
        ensure_same_id(id, data.id)?;
        data.validate()?;

        let task = self.repo.update(id, data).await?;
        info!(task_id = task.id, status = %task.status, "Task updated");
        Ok(task)
    }

    /// Deletes a task
    ///
    /// Returns `true` if the task existed and was removed, `false` otherwise.
    pub async fn delete(&self, id: i32) -> StoreResult<bool> {
        match self.repo.delete(id).await {
            Ok(task) => {
                warn!(task_id = id, title = %task.title, "Task deleted");
                Ok(true)
            }
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
