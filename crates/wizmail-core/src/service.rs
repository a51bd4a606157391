//! Mailbox service.
//!
//! [`Mailbox`] owns one repository per record type, all sharing a single
//! connection pool, and combines them with the pure classifier, matcher and
//! analysis functions.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisOptions, AnalysisResult, Priority, analyze};
use crate::category::{CategoryRepository, category_counts, filter_by_category};
use crate::mailbox::{Email, EmailId, EmailRepository, FolderCounts, classify, folder_counts};
use crate::summary::{DailySummary, daily_summary};
use crate::task::{Task, TaskPriority, TaskRepository};
use crate::template::{TemplateId, TemplateRepository};
use crate::{Error, Result};

/// Entry point for mailbox operations backed by one `SQLite` database.
pub struct Mailbox {
    emails: EmailRepository,
    categories: CategoryRepository,
    templates: TemplateRepository,
    tasks: TaskRepository,
}

impl Mailbox {
    /// Open (or create) the database at `database_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn open(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        info!(path = database_path, "Opened mailbox database");
        Self::with_pool(pool).await
    }

    /// Create an in-memory mailbox for testing.
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

    async fn with_pool(pool: sqlx::SqlitePool) -> Result<Self> {
        Ok(Self {
            emails: EmailRepository::with_pool(pool.clone()).await?,
            categories: CategoryRepository::with_pool(pool.clone()).await?,
            templates: TemplateRepository::with_pool(pool.clone()).await?,
            tasks: TaskRepository::with_pool(pool).await?,
        })
    }

    /// Email storage.
    #[must_use]
    pub const fn emails(&self) -> &EmailRepository {
        &self.emails
    }

    /// Category rule storage.
    #[must_use]
    pub const fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    /// Template storage.
    #[must_use]
    pub const fn templates(&self) -> &TemplateRepository {
        &self.templates
    }

    /// Task storage.
    #[must_use]
    pub const fn tasks(&self) -> &TaskRepository {
        &self.tasks
    }

    /// Emails visible in `folder`, optionally narrowed to one category.
    ///
    /// An unrecognized folder name yields every email. If the category can't
    /// be loaded, the unfiltered folder is returned and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the emails can't be loaded.
    pub async fn folder_view(&self, folder: &str, category_id: Option<&str>) -> Result<Vec<Email>> {
        let all = self.emails.list().await?;
        let view = classify(&all, folder);

        let view = match category_id {
            None => view,
            Some(id) => match self.categories.get(id).await {
                Ok(Some(rule)) => filter_by_category(&view, &rule),
                Ok(None) => {
                    warn!(category = id, "Unknown category, showing whole folder");
                    view
                }
                Err(e) => {
                    warn!(category = id, error = %e, "Category lookup failed, showing whole folder");
                    view
                }
            },
        };

        debug!(folder, count = view.len(), "Built folder view");
        Ok(view.into_iter().cloned().collect())
    }

    /// Inbox email count per category ID.
    ///
    /// # Errors
    ///
    /// Returns an error if emails or categories can't be loaded.
    pub async fn category_counts(&self) -> Result<HashMap<String, usize>> {
        let emails = self.emails.list().await?;
        let rules = self.categories.list().await?;
        Ok(category_counts(&rules, &emails))
    }

    /// Total and unread counts for every folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the emails can't be loaded.
    pub async fn folder_counts(&self) -> Result<FolderCounts> {
        let emails = self.emails.list().await?;
        Ok(folder_counts(&emails))
    }

    /// Permanently delete every trashed email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn empty_trash(&self) -> Result<u64> {
        let removed = self.emails.empty_trash().await?;
        info!(removed, "Emptied trash");
        Ok(removed)
    }

    /// Analyze a stored email without changing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`](crate::Error::EmailNotFound) if no
    /// email has this ID.
    pub async fn analyze(&self, id: &EmailId, options: &AnalysisOptions) -> Result<AnalysisResult> {
        let email = self.emails.require(id).await?;
        Ok(analyze(&email, options))
    }

    /// Analyze a stored email and add its suggested labels.
    ///
    /// Returns the analysis and the updated email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`](crate::Error::EmailNotFound) if no
    /// email has this ID.
    pub async fn analyze_and_label(
        &self,
        id: &EmailId,
        options: &AnalysisOptions,
    ) -> Result<(AnalysisResult, Email)> {
        let result = self.analyze(id, options).await?;
        let email = self.emails.add_labels(id, &result.auto_labels).await?;

        debug!(email = %id, labels = ?result.auto_labels, "Applied analysis labels");
        Ok((result, email))
    }

    /// Create one task per action item found in a stored email.
    ///
    /// Action items are always extracted, whatever `options` says. Tasks are
    /// high priority when the email looks urgent, medium otherwise, and are
    /// linked back to the email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailNotFound`](crate::Error::EmailNotFound) if no
    /// email has this ID, or an error if a task can't be stored.
    pub async fn tasks_from_analysis(
        &self,
        id: &EmailId,
        options: &AnalysisOptions,
    ) -> Result<Vec<Task>> {
        let email = self.emails.require(id).await?;
        let options = AnalysisOptions {
            include_action_items: true,
            ..*options
        };
        let result = analyze(&email, &options);

        let priority = if result.priority == Priority::High {
            TaskPriority::High
        } else {
            TaskPriority::Medium
        };

        let mut created = Vec::with_capacity(result.action_items.len());
        for item in &result.action_items {
            let task = Task::new(item.clone())
                .with_priority(priority)
                .with_description(format!("From email: {}", email.subject))
                .for_email(email.id.clone());
            created.push(self.tasks.create(&task).await?);
        }

        info!(email = %id, count = created.len(), "Created tasks from analysis");
        Ok(created)
    }

    /// Summarize the emails received in the last `hours` hours.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `hours` is negative or reaches past
    /// the representable date range, or an error if the emails can't be
    /// loaded.
    pub async fn daily_summary(&self, hours: i64) -> Result<DailySummary> {
        let end = Utc::now();
        let start = Duration::try_hours(hours)
            .filter(|_| hours >= 0)
            .and_then(|period| end.checked_sub_signed(period))
            .ok_or_else(|| {
                Error::Validation(format!("summary period of {hours} hours is out of range"))
            })?;
        let emails = self.emails.list().await?;
        Ok(daily_summary(&emails, start, end))
    }

    /// Store a new draft built from a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`](crate::Error::TemplateNotFound) if
    /// no template has this ID.
    pub async fn draft_from_template(&self, id: &TemplateId) -> Result<Email> {
        let template = self.templates.require(id).await?;
        let draft = template.to_draft();
        self.emails.upsert(&draft).await?;
        Ok(draft)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::category::{CategoryRule, Condition, ConditionKind};

    fn email(id: &str, subject: &str, sender: &str) -> Email {
        let mut email = Email::new(id);
        email.subject = subject.to_string();
        email.sender_address = sender.to_string();
        email
    }

    #[tokio::test]
    async fn test_folder_view_with_category() {
        let mailbox = Mailbox::in_memory().await.unwrap();
        mailbox.categories().seed_defaults().await.unwrap();
        mailbox
            .emails()
            .upsert_many(&[
                email("1", "Your order", "orders@amazon.com"),
                email("2", "Lunch?", "friend@example.com"),
            ])
            .await
            .unwrap();

        let view = mailbox.folder_view("inbox", Some("shopping")).await.unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_folder_view_unknown_category_falls_back() {
        let mailbox = Mailbox::in_memory().await.unwrap();
        mailbox
            .emails()
            .upsert_many(&[email("1", "a", "x@y"), email("2", "b", "x@y")])
            .await
            .unwrap();

        let view = mailbox.folder_view("inbox", Some("nope")).await.unwrap();
        assert_eq!(view.len(), 2);
    }

    #[tokio::test]
    async fn test_category_counts_use_stored_rules() {
        let mailbox = Mailbox::in_memory().await.unwrap();
        let rule = CategoryRule::new(
            "Boss",
            vec![Condition::contains(ConditionKind::Sender, "boss@")],
        );
        mailbox.categories().save(&rule).await.unwrap();
        mailbox
            .emails()
            .upsert(&email("1", "Status", "boss@corp.example"))
            .await
            .unwrap();

        let counts = mailbox.category_counts().await.unwrap();
        assert_eq!(counts[&rule.id], 1);
    }

    #[tokio::test]
    async fn test_analyze_and_label() {
        let mailbox = Mailbox::in_memory().await.unwrap();
        mailbox
            .emails()
            .upsert(&email("1", "Invoice overdue - urgent", "billing@x"))
            .await
            .unwrap();

        let (result, updated) = mailbox
            .analyze_and_label(&"1".into(), &AnalysisOptions::default())
            .await
            .unwrap();
        assert!(result.important);
        assert!(updated.has_label("finance"));
        assert!(updated.has_label("urgent"));
    }

    #[tokio::test]
    async fn test_tasks_from_analysis() {
        let mailbox = Mailbox::in_memory().await.unwrap();
        let mut mail = email("1", "Urgent: launch", "pm@x");
        mail.body = "Team,\nPlease sign off the copy.\n- book the venue\nThanks".to_string();
        mailbox.emails().upsert(&mail).await.unwrap();

        let tasks = mailbox
            .tasks_from_analysis(&"1".into(), &AnalysisOptions::default())
            .await
            .unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Please sign off the copy.", "- book the venue"]);
        assert!(tasks.iter().all(|t| t.priority == TaskPriority::High));
        assert!(tasks.iter().all(|t| t.email_id == Some(EmailId::new("1"))));
    }

    #[tokio::test]
    async fn test_daily_summary_rejects_out_of_range_period() {
        let mailbox = Mailbox::in_memory().await.unwrap();

        for hours in [i64::MAX / 1000, i64::MAX, -1] {
            let err = mailbox.daily_summary(hours).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{hours}: {err}");
        }

        let summary = mailbox.daily_summary(24).await.unwrap();
        assert_eq!(summary.total_emails, 0);
    }

    #[tokio::test]
    async fn test_draft_from_template() {
        let mailbox = Mailbox::in_memory().await.unwrap();
        let template = crate::template::Template::new(
            "Thanks",
            "Thank you",
            "Much appreciated.",
            crate::template::TemplateCategory::Personal,
        );
        mailbox.templates().create(&template).await.unwrap();

        let draft = mailbox.draft_from_template(&template.id).await.unwrap();
        let drafts = mailbox.folder_view("draft", None).await.unwrap();
        assert_eq!(drafts, vec![draft]);
    }
}
