//! Folder views over a flat mailbox.
//!
//! Emails are stored in one collection. Folder membership is derived from the
//! `tags` set and the trash/archive flags:
//!
//! | Folder  | Predicate                                                 |
//! |---------|-----------------------------------------------------------|
//! | trash   | `is_trash`                                                |
//! | archive | `is_archive`                                              |
//! | draft   | tagged `draft`, not trashed or archived                   |
//! | sent    | tagged `sent`, not `draft`, not trashed or archived       |
//! | junk    | tagged `junk`, not `draft`/`sent`, not trashed/archived   |
//! | inbox   | not trashed, not archived, not `draft`, not `junk`        |
//!
//! The inbox predicate deliberately does not exclude `sent`: mail the user
//! sent stays visible in the inbox. An email flagged both trash and archive
//! shows in both of those views.

use serde::Serialize;

use super::model::{Email, TAG_DRAFT, TAG_JUNK, TAG_SENT};

/// One of the six canonical mailbox views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    /// Active mail.
    Inbox,
    /// Unsent drafts.
    Draft,
    /// Sent mail.
    Sent,
    /// Junk mail.
    Junk,
    /// Trashed mail.
    Trash,
    /// Archived mail.
    Archive,
}

impl Folder {
    /// All folders in navigation order.
    pub const ALL: [Self; 6] = [
        Self::Inbox,
        Self::Draft,
        Self::Sent,
        Self::Junk,
        Self::Trash,
        Self::Archive,
    ];

    /// Parse a folder name. Returns `None` for unrecognized names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "inbox" => Some(Self::Inbox),
            "draft" | "drafts" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "junk" | "spam" => Some(Self::Junk),
            "trash" => Some(Self::Trash),
            "archive" => Some(Self::Archive),
            _ => None,
        }
    }

    /// Canonical folder name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Junk => "junk",
            Self::Trash => "trash",
            Self::Archive => "archive",
        }
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Draft => "Drafts",
            Self::Sent => "Sent",
            Self::Junk => "Junk",
            Self::Trash => "Trash",
            Self::Archive => "Archive",
        }
    }

    /// Check whether an email is visible in this folder.
    #[must_use]
    pub fn contains(&self, email: &Email) -> bool {
        let dispositioned = email.is_trash || email.is_archive;
        match self {
            Self::Trash => email.is_trash,
            Self::Archive => email.is_archive,
            Self::Draft => !dispositioned && email.has_tag(TAG_DRAFT),
            Self::Sent => !dispositioned && !email.has_tag(TAG_DRAFT) && email.has_tag(TAG_SENT),
            Self::Junk => {
                !dispositioned
                    && !email.has_tag(TAG_DRAFT)
                    && !email.has_tag(TAG_SENT)
                    && email.has_tag(TAG_JUNK)
            }
            Self::Inbox => {
                !dispositioned && !email.has_tag(TAG_DRAFT) && !email.has_tag(TAG_JUNK)
            }
        }
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Folder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown folder: {s}"))
    }
}

/// Return the emails visible in a folder, preserving input order.
///
/// An unrecognized folder name is not an error: the whole collection is
/// returned unchanged.
#[must_use]
pub fn classify<'a>(emails: &'a [Email], folder: &str) -> Vec<&'a Email> {
    Folder::parse(folder).map_or_else(
        || emails.iter().collect(),
        |folder| classify_folder(emails, folder),
    )
}

/// Return the emails visible in a known folder, preserving input order.
#[must_use]
pub fn classify_folder(emails: &[Email], folder: Folder) -> Vec<&Email> {
    emails.iter().filter(|email| folder.contains(email)).collect()
}

/// Total and unread counts for one folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FolderCount {
    /// Emails visible in the folder.
    pub total: usize,
    /// Unread emails visible in the folder.
    pub unread: usize,
}

/// Per-folder counts for navigation badges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderCounts {
    counts: Vec<(Folder, FolderCount)>,
}

impl FolderCounts {
    /// Counts for one folder.
    #[must_use]
    pub fn get(&self, folder: Folder) -> FolderCount {
        self.counts
            .iter()
            .find(|(f, _)| *f == folder)
            .map(|(_, count)| *count)
            .unwrap_or_default()
    }

    /// Iterate folders in navigation order.
    pub fn iter(&self) -> impl Iterator<Item = (Folder, FolderCount)> + '_ {
        self.counts.iter().copied()
    }
}

/// Count total and unread emails for every folder.
#[must_use]
pub fn folder_counts(emails: &[Email]) -> FolderCounts {
    let counts = Folder::ALL
        .iter()
        .map(|folder| {
            let mut count = FolderCount::default();
            for email in emails.iter().filter(|email| folder.contains(email)) {
                count.total += 1;
                if !email.read {
                    count.unread += 1;
                }
            }
            (*folder, count)
        })
        .collect();

    FolderCounts { counts }
}
