//! Template data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mailbox::{Email, TAG_DRAFT};

/// Unique identifier for a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    /// Generate a fresh random ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// What a template is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    /// Anything else.
    #[default]
    General,
    /// Work correspondence.
    Business,
    /// Personal mail.
    Personal,
    /// Outreach and announcements.
    Marketing,
    /// Reminders and follow-ups.
    FollowUp,
}

impl TemplateCategory {
    /// All categories.
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::Business,
        Self::Personal,
        Self::Marketing,
        Self::FollowUp,
    ];

    /// Category name as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Business => "business",
            Self::Personal => "personal",
            Self::Marketing => "marketing",
            Self::FollowUp => "follow-up",
        }
    }

    /// Parse a stored category name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(Self::General),
            "business" => Some(Self::Business),
            "personal" => Some(Self::Personal),
            "marketing" => Some(Self::Marketing),
            "follow-up" | "followup" => Some(Self::FollowUp),
            _ => None,
        }
    }
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown template category: {s}"))
    }
}

/// A reusable email body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique identifier.
    pub id: TemplateId,
    /// Display name.
    pub name: String,
    /// Subject line for drafts.
    pub subject: String,
    /// Body text for drafts.
    pub body: String,
    /// What the template is for.
    pub category: TemplateCategory,
    /// Whether the template is shared.
    pub is_public: bool,
    /// When the template was created.
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Creates a new private template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        category: TemplateCategory,
    ) -> Self {
        Self {
            id: TemplateId::generate(),
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
            category,
            is_public: false,
            created_at: Utc::now(),
        }
    }

    /// Builds an unsent draft prefilled from this template.
    #[must_use]
    pub fn to_draft(&self) -> Email {
        let mut draft = Email::new(uuid::Uuid::new_v4().to_string());
        draft.subject.clone_from(&self.subject);
        draft.body.clone_from(&self.body);
        draft.read = true;
        draft.tags = vec![TAG_DRAFT.to_string()];
        draft
    }
}
