//! Template storage repository.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use super::model::{Template, TemplateCategory, TemplateId};
use super::validation::validate_template;
use crate::{Error, Result};

/// Repository for email templates.
pub struct TemplateRepository {
    pool: SqlitePool,
}

impl TemplateRepository {
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
            CREATE TABLE IF NOT EXISTS templates (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'general',
                is_public INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a new template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the template is invalid, or an error if
    /// the database query fails.
    pub async fn create(&self, template: &Template) -> Result<()> {
        validate_template(template).map_err(|errors| Error::validation(&errors))?;

        sqlx::query(
            r"
            INSERT INTO templates (id, name, subject, body, category, is_public, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(template.id.as_str())
        .bind(&template.name)
        .bind(&template.subject)
        .bind(&template.body)
        .bind(template.category.as_str())
        .bind(template.is_public)
        .bind(template.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(template = %template.id, "Created template");
        Ok(())
    }

    /// Get a template by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: &TemplateId) -> Result<Option<Template>> {
        let row = sqlx::query(
            r"
            SELECT id, name, subject, body, category, is_public, created_at
            FROM templates
            WHERE id = ?
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_template(&r)))
    }

    /// Get a template by ID, failing if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] if no template has this ID.
    pub async fn require(&self, id: &TemplateId) -> Result<Template> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::TemplateNotFound(id.to_string()))
    }

    /// Replace a stored template's editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the template is invalid, or
    /// [`Error::TemplateNotFound`] if it was never stored.
    pub async fn update(&self, template: &Template) -> Result<()> {
        validate_template(template).map_err(|errors| Error::validation(&errors))?;

        let updated = sqlx::query(
            r"
            UPDATE templates
            SET name = ?, subject = ?, body = ?, category = ?, is_public = ?
            WHERE id = ?
            ",
        )
        .bind(&template.name)
        .bind(&template.subject)
        .bind(&template.body)
        .bind(template.category.as_str())
        .bind(template.is_public)
        .bind(template.id.as_str())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::TemplateNotFound(template.id.to_string()));
        }
        Ok(())
    }

    /// Delete a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] if no template has this ID.
    pub async fn delete(&self, id: &TemplateId) -> Result<()> {
        let deleted = sqlx::query(r"DELETE FROM templates WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(Error::TemplateNotFound(id.to_string()));
        }
        Ok(())
    }

    /// List templates, newest first.
    ///
    /// Private templates are always listed; shared ones only when
    /// `include_public` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        category: Option<TemplateCategory>,
        include_public: bool,
    ) -> Result<Vec<Template>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, subject, body, category, is_public, created_at
            FROM templates
            WHERE (is_public = 0 OR ?)
              AND (? IS NULL OR category = ?)
            ORDER BY created_at DESC, id ASC
            ",
        )
        .bind(include_public)
        .bind(category.map(|c| c.as_str()))
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_template).collect())
    }
}

/// Convert a database row to a `Template`.
fn row_to_template(row: &sqlx::sqlite::SqliteRow) -> Template {
    let id: String = row.get("id");
    let category_str: String = row.get("category");
    let category = TemplateCategory::parse(&category_str).unwrap_or_else(|| {
        warn!(template = %id, category = %category_str, "Unknown template category");
        TemplateCategory::General
    });
    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |d| d.with_timezone(&Utc));

    Template {
        id: TemplateId(id),
        name: row.get("name"),
        subject: row.get("subject"),
        body: row.get("body"),
        category,
        is_public: row.get("is_public"),
        created_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn template(name: &str, category: TemplateCategory, age_minutes: i64) -> Template {
        let mut template = Template::new(name, "Subject", "Body", category);
        template.created_at = Utc::now() - Duration::minutes(age_minutes);
        template
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = TemplateRepository::in_memory().await.unwrap();
        let template = template("Welcome", TemplateCategory::Business, 0);

        repo.create(&template).await.unwrap();

        let loaded = repo.require(&template.id).await.unwrap();
        assert_eq!(loaded.name, "Welcome");
        assert_eq!(loaded.category, TemplateCategory::Business);
        assert!(!loaded.is_public);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_body() {
        let repo = TemplateRepository::in_memory().await.unwrap();
        let template = Template::new("Empty", "Subject", "  ", TemplateCategory::General);

        assert!(matches!(
            repo.create(&template).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = TemplateRepository::in_memory().await.unwrap();
        let mut template = template("Draft", TemplateCategory::General, 0);
        repo.create(&template).await.unwrap();

        template.subject = "New subject".to_string();
        template.is_public = true;
        repo.update(&template).await.unwrap();
        let loaded = repo.require(&template.id).await.unwrap();
        assert_eq!(loaded.subject, "New subject");
        assert!(loaded.is_public);

        repo.delete(&template.id).await.unwrap();
        assert!(matches!(
            repo.require(&template.id).await,
            Err(Error::TemplateNotFound(_))
        ));
        assert!(matches!(
            repo.update(&template).await,
            Err(Error::TemplateNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let repo = TemplateRepository::in_memory().await.unwrap();
        let old = template("Old", TemplateCategory::Business, 30);
        let new = template("New", TemplateCategory::Business, 1);
        let personal = template("Personal", TemplateCategory::Personal, 10);
        let mut shared = template("Shared", TemplateCategory::Business, 5);
        shared.is_public = true;
        for t in [&old, &new, &personal, &shared] {
            repo.create(t).await.unwrap();
        }

        let names = |templates: Vec<Template>| -> Vec<String> {
            templates.into_iter().map(|t| t.name).collect()
        };

        assert_eq!(
            names(repo.list(None, false).await.unwrap()),
            vec!["New", "Personal", "Old"]
        );
        assert_eq!(
            names(repo.list(Some(TemplateCategory::Business), true).await.unwrap()),
            vec!["New", "Shared", "Old"]
        );
    }
}
