/// In-memory repositories for tests
///
/// `MemoryStore` implements the same traits as `PgStore` with the same
/// semantics: generated IDs, insertion ordering, referential integrity on
/// `assigned_user_id`, and unassignment when a user is deleted.
///
/// Enabled in other crates with the `test-utils` feature:
///
/// ```toml
/// [dev-dependencies]
/// taskboard-shared = { path = "../taskboard-shared", features = ["test-utils"] }
/// ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ensure_same_id, StoreHealth, TaskRepository, UserRepository};
use crate::error::{StoreError, StoreResult};
use crate::models::task::{NewTask, Task, TaskPayload, TaskStatus};
use crate::models::user::{NewUser, User, UserPayload};
use crate::models::Fetch;

#[derive(Debug, Default)]
struct Tables {
    tasks: BTreeMap<i32, Task>,
    users: BTreeMap<i32, User>,
    next_task_id: i32,
    next_user_id: i32,
}

impl Tables {
    fn with_related_user(&self, task: &Task, fetch: Fetch) -> Task {
        let mut task = task.clone().without_related();
        if fetch.includes_related() {
            task.assigned_user = task
                .assigned_user_id
                .and_then(|id| self.users.get(&id))
                .map(User::summary);
        }
        task
    }

    fn with_related_tasks(&self, user: &User, fetch: Fetch) -> User {
        let mut user = user.clone();
        user.tasks = if fetch.includes_related() {
            self.tasks
                .values()
                .filter(|t| t.assigned_user_id == Some(user.id))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        user
    }
}

/// Thread-safe in-memory store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulates the database going away (or coming back)
    ///
    /// While unavailable every operation fails with a connection error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn list(&self, fetch: Fetch) -> StoreResult<Vec<Task>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .map(|t| tables.with_related_user(t, fetch))
            .collect())
    }

    async fn find_by_id(&self, id: i32, fetch: Fetch) -> StoreResult<Option<Task>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .map(|t| tables.with_related_user(t, fetch)))
    }

    async fn create(&self, data: NewTask) -> StoreResult<Task> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        tables.next_task_id += 1;
        let task = Task {
            id: tables.next_task_id,
            title: data.title,
            description: data.description,
            status: TaskStatus::Open,
            priority: data.priority,
            due_date: data.due_date,
            assigned_user_id: None,
            assigned_user: None,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: i32, data: TaskPayload) -> StoreResult<Task> {
        self.check_available()?;
        ensure_same_id(id, data.id)?;

        let mut tables = self.tables.write().await;
        if let Some(user_id) = data.assigned_user_id {
            if !tables.users.contains_key(&user_id) {
                return Err(StoreError::UnknownUser(user_id));
            }
        }

        let task = tables
            .tasks
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "task", id })?;
        task.title = data.title;
        task.description = data.description;
        task.status = data.status;
        task.priority = data.priority;
        task.due_date = data.due_date;
        task.assigned_user_id = data.assigned_user_id;
        Ok(task.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<Task> {
        self.check_available()?;
        self.tables
            .write()
            .await
            .tasks
            .remove(&id)
            .ok_or(StoreError::NotFound { entity: "task", id })
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self, fetch: Fetch) -> StoreResult<Vec<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .map(|u| tables.with_related_tasks(u, fetch))
            .collect())
    }

    async fn find_by_id(&self, id: i32, fetch: Fetch) -> StoreResult<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(&id)
            .map(|u| tables.with_related_tasks(u, fetch)))
    }

    async fn create(&self, data: NewUser) -> StoreResult<User> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            name: data.name,
            email: data.email,
            tasks: Vec::new(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, data: UserPayload) -> StoreResult<User> {
        self.check_available()?;
        ensure_same_id(id, data.id)?;

        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "user", id })?;
        user.name = data.name;
        user.email = data.email;
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<User> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .remove(&id)
            .ok_or(StoreError::NotFound { entity: "user", id })?;

        // ON DELETE SET NULL
        for task in tables.tasks.values_mut() {
            if task.assigned_user_id == Some(id) {
                task.assigned_user_id = None;
            }
        }

        Ok(user)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }
}
