/// PostgreSQL implementation of the repositories
///
/// `PgStore` wraps a `PgPool`; every operation borrows a pooled connection for
/// a single statement (two for a user read with related tasks). There are no
/// multi-statement transactions.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::models::Fetch;
/// use taskboard_shared::repository::{PgStore, TaskRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = PgStore::new(pool);
///
/// for task in TaskRepository::list(&store, Fetch::WithRelated).await? {
///     println!("{} {:?}", task.title, task.assigned_user);
/// }
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::debug;

use super::{ensure_same_id, StoreHealth, TaskRepository, UserRepository};
use crate::db::pool;
use crate::error::{StoreError, StoreResult};
use crate::models::task::{NewTask, Task, TaskPayload, TaskStatus};
use crate::models::user::{NewUser, User, UserPayload, UserSummary};
use crate::models::Fetch;

/// PostgreSQL error code for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.priority, \
     t.due_date, t.assigned_user_id";

const USER_COLUMNS: &str = "id, name, email";

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Task row as selected, optionally joined with its assignee
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i32,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: Option<chrono::DateTime<chrono::Utc>>,
    assigned_user_id: Option<i32>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("task {}: {}", row.id, e)))?;
        let priority = row
            .priority
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("task {}: {}", row.id, e)))?;

        let assigned_user = match (row.assigned_user_id, row.assignee_name) {
            (Some(id), Some(name)) => Some(UserSummary {
                id,
                name,
                email: row.assignee_email,
            }),
            _ => None,
        };

        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status,
            priority,
            due_date: row.due_date,
            assigned_user_id: row.assigned_user_id,
            assigned_user,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            tasks: Vec::new(),
        }
    }
}

/// Builds the task SELECT clause for the requested fetch mode
fn task_select(fetch: Fetch) -> String {
    if fetch.includes_related() {
        format!(
            "SELECT {TASK_COLUMNS}, u.name AS assignee_name, u.email AS assignee_email \
             FROM tasks t LEFT JOIN users u ON u.id = t.assigned_user_id"
        )
    } else {
        format!(
            "SELECT {TASK_COLUMNS}, NULL::TEXT AS assignee_name, NULL::TEXT AS assignee_email \
             FROM tasks t"
        )
    }
}

/// RETURNING clause shared by task writes (never joined)
fn task_returning() -> String {
    let columns = TASK_COLUMNS.replace("t.", "");
    format!("RETURNING {columns}, NULL::TEXT AS assignee_name, NULL::TEXT AS assignee_email")
}

/// Maps a foreign key violation on `assigned_user_id` to `UnknownUser`
fn map_write_error(err: sqlx::Error, assigned_user_id: Option<i32>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            if let Some(user_id) = assigned_user_id {
                return StoreError::UnknownUser(user_id);
            }
        }
    }
    StoreError::Database(err)
}

fn rows_to_tasks(rows: Vec<TaskRow>) -> StoreResult<Vec<Task>> {
    rows.into_iter().map(Task::try_from).collect()
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn list(&self, fetch: Fetch) -> StoreResult<Vec<Task>> {
        let query = format!("{} ORDER BY t.id", task_select(fetch));
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), ?fetch, "Loaded tasks");
        rows_to_tasks(rows)
    }

    async fn find_by_id(&self, id: i32, fetch: Fetch) -> StoreResult<Option<Task>> {
        let query = format!("{} WHERE t.id = $1", task_select(fetch));
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Task::try_from).transpose()
    }

    async fn create(&self, data: NewTask) -> StoreResult<Task> {
        let query = format!(
            "INSERT INTO tasks (title, description, status, priority, due_date) \
             VALUES ($1, $2, $3, $4, $5) {}",
            task_returning()
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(TaskStatus::Open.as_str())
            .bind(data.priority.as_str())
            .bind(data.due_date)
            .fetch_one(&self.pool)
            .await?;

        Task::try_from(row)
    }

    async fn update(&self, id: i32, data: TaskPayload) -> StoreResult<Task> {
        ensure_same_id(id, data.id)?;

        let query = format!(
            "UPDATE tasks t \
             SET title = $2, description = $3, status = $4, priority = $5, \
                 due_date = $6, assigned_user_id = $7 \
             WHERE t.id = $1 {}",
            task_returning()
        );
        let assigned_user_id = data.assigned_user_id;
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status.as_str())
            .bind(data.priority.as_str())
            .bind(data.due_date)
            .bind(assigned_user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, assigned_user_id))?;

        match row {
            Some(row) => Task::try_from(row),
            None => Err(StoreError::NotFound { entity: "task", id }),
        }
    }

    async fn delete(&self, id: i32) -> StoreResult<Task> {
        let query = format!("DELETE FROM tasks t WHERE t.id = $1 {}", task_returning());
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Task::try_from(row),
            None => Err(StoreError::NotFound { entity: "task", id }),
        }
    }
}

impl PgStore {
    /// Attaches each user's assigned tasks with one extra query
    async fn attach_tasks(&self, users: &mut [User]) -> StoreResult<()> {
        if users.is_empty() {
            return Ok(());
        }

        let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        let query = format!(
            "{} WHERE t.assigned_user_id = ANY($1) ORDER BY t.id",
            task_select(Fetch::Shallow)
        );
        let rows = sqlx::query_as::<_, TaskRow>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_user: HashMap<i32, Vec<Task>> = HashMap::new();
        for task in rows_to_tasks(rows)? {
            if let Some(user_id) = task.assigned_user_id {
                by_user.entry(user_id).or_default().push(task);
            }
        }

        for user in users.iter_mut() {
            user.tasks = by_user.remove(&user.id).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn list(&self, fetch: Fetch) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        let mut users: Vec<User> = rows.into_iter().map(User::from).collect();
        if fetch.includes_related() {
            self.attach_tasks(&mut users).await?;
        }

        debug!(count = users.len(), ?fetch, "Loaded users");
        Ok(users)
    }

    async fn find_by_id(&self, id: i32, fetch: Fetch) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut users = [User::from(row)];
        if fetch.includes_related() {
            self.attach_tasks(&mut users).await?;
        }

        let [user] = users;
        Ok(Some(user))
    }

    async fn create(&self, data: NewUser) -> StoreResult<User> {
        let query =
            format!("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING {USER_COLUMNS}");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(data.name)
            .bind(data.email)
            .fetch_one(&self.pool)
            .await?;

        Ok(User::from(row))
    }

    async fn update(&self, id: i32, data: UserPayload) -> StoreResult<User> {
        ensure_same_id(id, data.id)?;

        let query = format!(
            "UPDATE users SET name = $2, email = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::from)
            .ok_or(StoreError::NotFound { entity: "user", id })
    }

    async fn delete(&self, id: i32) -> StoreResult<User> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::from)
            .ok_or(StoreError::NotFound { entity: "user", id })
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskPriority;

    fn row(status: &str, priority: &str) -> TaskRow {
        TaskRow {
            id: 1,
            title: "Ship".to_string(),
            description: None,
            status: status.to_string(),
            priority: priority.to_string(),
            due_date: None,
            assigned_user_id: Some(5),
            assignee_name: Some("Grace".to_string()),
            assignee_email: None,
        }
    }

    #[test]
    fn test_task_row_conversion() {
        let task = Task::try_from(row("InProgress", "High")).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        let assignee = task.assigned_user.unwrap();
        assert_eq!(assignee.id, 5);
        assert_eq!(assignee.name, "Grace");
    }

    #[test]
    fn test_task_row_without_join_has_no_assignee() {
        let mut shallow = row("Open", "Low");
        shallow.assignee_name = None;
        let task = Task::try_from(shallow).unwrap();
        assert_eq!(task.assigned_user_id, Some(5));
        assert!(task.assigned_user.is_none());
    }

    #[test]
    fn test_task_row_with_unknown_status_is_corrupt() {
        let err = Task::try_from(row("Blocked", "Low")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_task_select_modes() {
        assert!(task_select(Fetch::WithRelated).contains("LEFT JOIN users"));
        assert!(!task_select(Fetch::Shallow).contains("JOIN"));
    }

    #[test]
    fn test_task_returning_uses_bare_columns() {
        let clause = task_returning();
        assert!(clause.starts_with("RETURNING id, title"));
        assert!(!clause.contains("t."));
    }

    #[test]
    fn test_map_write_error_passes_through_other_errors() {
        let err = map_write_error(sqlx::Error::PoolTimedOut, Some(3));
        assert!(matches!(err, StoreError::Database(_)));
    }
}
