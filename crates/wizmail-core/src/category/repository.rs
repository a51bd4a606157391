//! Category rule storage.

use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use super::builtin::builtin_categories;
use super::model::{CategoryRule, Condition};
use super::validation::validate_rule;
use crate::{Error, Result};

/// Repository for user-defined category rules.
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
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
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT 'Tag',
                description TEXT NOT NULL DEFAULT '',
                conditions_json TEXT NOT NULL DEFAULT '[]',
                position INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get all rules in the order they were first saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<CategoryRule>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, icon, description, conditions_json
            FROM categories
            ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_rule).collect())
    }

    /// Get a rule by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: &str) -> Result<Option<CategoryRule>> {
        let row = sqlx::query(
            r"
            SELECT id, name, icon, description, conditions_json
            FROM categories
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_rule(&r)))
    }

    /// Get a rule by ID, failing if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] if no rule has this ID.
    pub async fn require(&self, id: &str) -> Result<CategoryRule> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }

    /// Insert a rule or replace the stored rule with the same ID.
    ///
    /// A replaced rule keeps its position in the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the rule is invalid, or an error if the
    /// database query fails.
    pub async fn save(&self, rule: &CategoryRule) -> Result<()> {
        validate_rule(rule).map_err(|errors| Error::validation(&errors))?;

        let conditions_json = serde_json::to_string(&rule.conditions)?;

        sqlx::query(
            r"
            INSERT INTO categories (id, name, icon, description, conditions_json, position)
            VALUES (?, ?, ?, ?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM categories))
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                icon = excluded.icon,
                description = excluded.description,
                conditions_json = excluded.conditions_json,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(&rule.id)
        .bind(&rule.name)
        .bind(&rule.icon)
        .bind(&rule.description)
        .bind(conditions_json)
        .execute(&self.pool)
        .await?;

        debug!(category = %rule.id, conditions = rule.conditions.len(), "Saved category");
        Ok(())
    }

    /// Delete a rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] if no rule has this ID.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let deleted = sqlx::query(r"DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(Error::CategoryNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Insert the built-in categories if no rules exist yet.
    ///
    /// Returns the number of rules inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let row = sqlx::query(r"SELECT COUNT(*) as count FROM categories")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get("count");
        if count > 0 {
            return Ok(0);
        }

        let defaults = builtin_categories();
        for rule in &defaults {
            self.save(rule).await?;
        }

        info!(count = defaults.len(), "Seeded default categories");
        Ok(defaults.len())
    }
}

/// Convert a database row to a `CategoryRule`.
fn row_to_rule(row: &sqlx::sqlite::SqliteRow) -> CategoryRule {
    let id: String = row.get("id");
    let conditions_json: String = row.get("conditions_json");
    let conditions: Vec<Condition> = serde_json::from_str(&conditions_json).unwrap_or_else(|e| {
        warn!(category = %id, error = %e, "Malformed conditions, treating as empty");
        Vec::new()
    });

    CategoryRule {
        id,
        name: row.get("name"),
        icon: row.get("icon"),
        description: row.get("description"),
        conditions,
    }
}
