//! Email storage repository.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use super::folder::Folder;
use super::model::{Email, EmailId};
use crate::{Error, Result};

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchPage {
    /// Matching emails for this page, newest first.
    pub emails: Vec<Email>,
    /// Total number of matches across all pages.
    pub total: usize,
    /// Page size requested.
    pub limit: u32,
    /// Offset requested.
    pub offset: u32,
}

/// Repository for email storage and retrieval.
pub struct EmailRepository {
    pool: SqlitePool,
}

impl EmailRepository {
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

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS emails (
                id TEXT PRIMARY KEY,
                sender_name TEXT NOT NULL DEFAULT '',
                sender_address TEXT NOT NULL DEFAULT '',
                subject TEXT NOT NULL DEFAULT '',
                body TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                labels_json TEXT NOT NULL DEFAULT '[]',
                tags_json TEXT NOT NULL DEFAULT '[]',
                is_trash INTEGER NOT NULL DEFAULT 0,
                is_archive INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Index for date-ordered listing
        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_emails_date
            ON emails(date DESC)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert an email or replace the stored copy with the same ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn upsert(&self, email: &Email) -> Result<()> {
        let labels_json = serde_json::to_string(&email.labels)?;
        let tags_json = serde_json::to_string(&email.tags)?;

        sqlx::query(
            r"
            INSERT INTO emails
                (id, sender_name, sender_address, subject, body, date,
                 is_read, labels_json, tags_json, is_trash, is_archive)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                sender_name = excluded.sender_name,
                sender_address = excluded.sender_address,
                subject = excluded.subject,
                body = excluded.body,
                date = excluded.date,
                is_read = excluded.is_read,
                labels_json = excluded.labels_json,
                tags_json = excluded.tags_json,
                is_trash = excluded.is_trash,
                is_archive = excluded.is_archive,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(email.id.as_str())
        .bind(&email.sender_name)
        .bind(&email.sender_address)
        .bind(&email.subject)
        .bind(&email.body)
        .bind(email.date.to_rfc3339())
        .bind(email.read)
        .bind(labels_json)
        .bind(tags_json)
        .bind(email.is_trash)
        .bind(email.is_archive)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace many emails.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn upsert_many(&self, emails: &[Email]) -> Result<usize> {
        for email in emails {
            self.upsert(email).await?;
        }
        debug!(count = emails.len(), "Stored emails");
        Ok(emails.len())
    }

    /// Get an email by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: &EmailId) -> Result<Option<Email>> {
        let row = sqlx::query(
            r"
            SELECT id, sender_name, sender_address, subject, body, date,
                   is_read, labels_json, tags_json, is_trash, is_archive
            FROM emails
            WHERE id = ?
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_email(&r)))
    }

    /// Get an email by ID, failing if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn require(&self, id: &EmailId) -> Result<Email> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::EmailNotFound(id.to_string()))
    }

    /// Get all emails, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Email>> {
        let rows = sqlx::query(
            r"
            SELECT id, sender_name, sender_address, subject, body, date,
                   is_read, labels_json, tags_json, is_trash, is_archive
            FROM emails
            ORDER BY date DESC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_email).collect())
    }

    /// Mark an email as read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn mark_read(&self, id: &EmailId) -> Result<()> {
        self.set_flag(id, "is_read", true).await
    }

    /// Mark an email as unread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn mark_unread(&self, id: &EmailId) -> Result<()> {
        self.set_flag(id, "is_read", false).await
    }

    /// Move an email to or out of the trash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn set_trash(&self, id: &EmailId, is_trash: bool) -> Result<()> {
        self.set_flag(id, "is_trash", is_trash).await
    }

    /// Archive or unarchive an email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn set_archive(&self, id: &EmailId, is_archive: bool) -> Result<()> {
        self.set_flag(id, "is_archive", is_archive).await
    }

    async fn set_flag(&self, id: &EmailId, column: &'static str, value: bool) -> Result<()> {
        // Column names come from the fixed set above, never from input.
        let sql = format!(
            "UPDATE emails SET {column} = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?"
        );
        let updated = sqlx::query(&sql)
            .bind(value)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::EmailNotFound(id.to_string()));
        }

        debug!(email = %id, column, value, "Updated email flag");
        Ok(())
    }

    /// Add a label to an email. Adding an existing label is a no-op.
    ///
    /// Returns the updated email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn add_label(&self, id: &EmailId, label: &str) -> Result<Email> {
        self.add_labels(id, &[label.to_string()]).await
    }

    /// Add several labels to an email, skipping ones already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn add_labels(&self, id: &EmailId, labels: &[String]) -> Result<Email> {
        let mut email = self.require(id).await?;
        let mut changed = false;
        for label in labels {
            changed |= email.add_label(label);
        }
        if changed {
            self.store_labels(&email).await?;
        }
        Ok(email)
    }

    /// Remove a label from an email. Removing a missing label is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn remove_label(&self, id: &EmailId, label: &str) -> Result<Email> {
        let mut email = self.require(id).await?;
        if email.remove_label(label) {
            self.store_labels(&email).await?;
        }
        Ok(email)
    }

    async fn store_labels(&self, email: &Email) -> Result<()> {
        let labels_json = serde_json::to_string(&email.labels)?;
        sqlx::query(
            r"
            UPDATE emails
            SET labels_json = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            ",
        )
        .bind(labels_json)
        .bind(email.id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Permanently delete every trashed email.
    ///
    /// Returns the number of emails removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn empty_trash(&self) -> Result<u64> {
        let deleted = sqlx::query(r"DELETE FROM emails WHERE is_trash = 1")
            .execute(&self.pool)
            .await?;

        debug!(count = deleted.rows_affected(), "Emptied trash");
        Ok(deleted.rows_affected())
    }

    /// Delete an email record entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`] if no email has this ID.
    pub async fn delete(&self, id: &EmailId) -> Result<()> {
        let deleted = sqlx::query(r"DELETE FROM emails WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(Error::EmailNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Search subject and body for a case-insensitive substring.
    ///
    /// A blank query yields an empty page. When `folder` is given, only
    /// matches visible in that folder are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(
        &self,
        query: &str,
        folder: Option<Folder>,
        limit: u32,
        offset: u32,
    ) -> Result<SearchPage> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchPage {
                limit,
                offset,
                ..SearchPage::default()
            });
        }

        // SQLite's lower() only folds ASCII, so case folding happens here.
        let needle = query.to_lowercase();
        let matches: Vec<Email> = self
            .list()
            .await?
            .into_iter()
            .filter(|email| {
                email.subject.to_lowercase().contains(&needle)
                    || email.body.to_lowercase().contains(&needle)
            })
            .filter(|email| folder.is_none_or(|f| f.contains(email)))
            .collect();

        let total = matches.len();
        let emails = matches
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(SearchPage {
            emails,
            total,
            limit,
            offset,
        })
    }
}

fn parse_string_set(raw: &str, column: &str, id: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(email = id, column, error = %e, "Malformed JSON column, treating as empty");
        Vec::new()
    })
}

/// Convert a database row to an `Email`.
fn row_to_email(row: &sqlx::sqlite::SqliteRow) -> Email {
    let id: String = row.get("id");
    let date_str: String = row.get("date");
    let date = DateTime::parse_from_rfc3339(&date_str)
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |d| d.with_timezone(&Utc));
    let labels_json: String = row.get("labels_json");
    let tags_json: String = row.get("tags_json");
    let labels = parse_string_set(&labels_json, "labels_json", &id);
    let tags = parse_string_set(&tags_json, "tags_json", &id);

    Email {
        id: EmailId(id),
        sender_name: row.get("sender_name"),
        sender_address: row.get("sender_address"),
        subject: row.get("subject"),
        body: row.get("body"),
        date,
        read: row.get::<bool, _>("is_read"),
        labels,
        tags,
        is_trash: row.get::<bool, _>("is_trash"),
        is_archive: row.get::<bool, _>("is_archive"),
    }
}
