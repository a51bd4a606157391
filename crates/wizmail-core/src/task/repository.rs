//! Task storage repository.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use super::model::{Task, TaskPage, TaskPatch, TaskPriority, TaskStatus};
use super::validation::validate_task;
use crate::mailbox::EmailId;
use crate::{Error, Result};

/// Repository for follow-up tasks.
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::with_pool(pool).await
    }

    /// Create a repository on an existing pool.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                priority INTEGER NOT NULL DEFAULT 1,
                due_date TEXT,
                email_id TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Index for the default listing order
        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_tasks_order
            ON tasks(priority DESC, due_date ASC, created_at DESC)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a new task. The task's `id` is ignored.
    ///
    /// Returns the stored task with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the title is blank, or an error if the
    /// database query fails.
    pub async fn create(&self, task: &Task) -> Result<Task> {
        validate_task(task).map_err(|errors| Error::validation(&errors))?;

        let result = sqlx::query(
            r"
            INSERT INTO tasks (title, description, status, priority, due_date, email_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.priority.rank())
        .bind(task.due_date.map(|d| d.to_rfc3339()))
        .bind(task.email_id.as_ref().map(EmailId::as_str))
        .bind(task.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(task = id, title = %task.title, "Created task");

        Ok(Task {
            id,
            ..task.clone()
        })
    }

    /// Get a task by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: i64) -> Result<Option<Task>> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, status, priority, due_date, email_id, created_at
            FROM tasks
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_task(&r)))
    }

    /// Apply a partial update to a task.
    ///
    /// Returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] if no task has this ID.
    pub async fn update(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        let mut task = self.get(id).await?.ok_or(Error::TaskNotFound(id))?;
        task.apply(patch);

        sqlx::query(
            r"
            UPDATE tasks
            SET title = ?, description = ?, status = ?, priority = ?, due_date = ?
            WHERE id = ?
            ",
        )
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.priority.rank())
        .bind(task.due_date.map(|d| d.to_rfc3339()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] if no task has this ID.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let deleted = sqlx::query(r"DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(Error::TaskNotFound(id));
        }
        Ok(())
    }

    /// List tasks, most pressing first.
    ///
    /// Ordered by priority (highest first), then due date (soonest first,
    /// undated last), then creation time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
        limit: u32,
        offset: u32,
    ) -> Result<TaskPage> {
        let status = status.map(|s| s.as_str());
        let priority = priority.map(|p| p.rank());

        let row = sqlx::query(
            r"
            SELECT COUNT(*) as count
            FROM tasks
            WHERE (? IS NULL OR status = ?) AND (? IS NULL OR priority = ?)
            ",
        )
        .bind(status)
        .bind(status)
        .bind(priority)
        .bind(priority)
        .fetch_one(&self.pool)
        .await?;
        let total: i64 = row.get("count");

        let rows = sqlx::query(
            r"
            SELECT id, title, description, status, priority, due_date, email_id, created_at
            FROM tasks
            WHERE (? IS NULL OR status = ?) AND (? IS NULL OR priority = ?)
            ORDER BY priority DESC,
                     due_date IS NULL, due_date ASC,
                     created_at DESC, id DESC
            LIMIT ? OFFSET ?
            ",
        )
        .bind(status)
        .bind(status)
        .bind(priority)
        .bind(priority)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(TaskPage {
            tasks: rows.iter().map(row_to_task).collect(),
            total: usize::try_from(total).unwrap_or_default(),
            limit,
            offset,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Convert a database row to a `Task`.
fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Task {
    let id: i64 = row.get("id");
    let status_str: String = row.get("status");
    let status = TaskStatus::parse(&status_str).unwrap_or_else(|| {
        warn!(task = id, status = %status_str, "Unknown task status");
        TaskStatus::Pending
    });
    let due_date: Option<String> = row.get("due_date");
    let email_id: Option<String> = row.get("email_id");
    let created_at: String = row.get("created_at");

    Task {
        id,
        title: row.get("title"),
        description: row.get("description"),
        status,
        priority: TaskPriority::from_rank(row.get("priority")),
        due_date: due_date.as_deref().and_then(parse_timestamp),
        email_id: email_id.map(EmailId),
        created_at: parse_timestamp(&created_at).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}
