//! Email data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Tag marking an unsent draft.
pub const TAG_DRAFT: &str = "draft";
/// Tag marking mail sent by the user.
pub const TAG_SENT: &str = "sent";
/// Tag marking junk mail.
pub const TAG_JUNK: &str = "junk";

/// Unique identifier for an email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailId(pub String);

impl EmailId {
    /// Create a new email ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EmailId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An email record as supplied by the store.
///
/// Only `id` is required when deserializing. Every other field falls back to
/// an empty value so sparse records never fault downstream matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)] // Flags mirror the store columns
pub struct Email {
    /// Unique identifier.
    pub id: EmailId,
    /// Sender display name.
    #[serde(default, alias = "name", deserialize_with = "null_as_default")]
    pub sender_name: String,
    /// Sender email address.
    #[serde(default, alias = "email", deserialize_with = "null_as_default")]
    pub sender_address: String,
    /// Message subject.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    /// Plain text body.
    #[serde(default, alias = "text", deserialize_with = "null_as_default")]
    pub body: String,
    /// When the message was received (or last edited, for drafts).
    #[serde(default = "epoch", deserialize_with = "null_as_epoch")]
    pub date: DateTime<Utc>,
    /// Whether the message has been read.
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
    /// User-facing labels.
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    /// Storage-level folder markers (`draft`, `sent`, `junk`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Moved to trash.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_trash: bool,
    /// Archived.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_archive: bool,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_epoch<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(epoch))
}

impl Email {
    /// Create an empty email with the given ID, dated now.
    #[must_use]
    pub fn new(id: impl Into<EmailId>) -> Self {
        Self {
            id: id.into(),
            sender_name: String::new(),
            sender_address: String::new(),
            subject: String::new(),
            body: String::new(),
            date: Utc::now(),
            read: false,
            labels: Vec::new(),
            tags: Vec::new(),
            is_trash: false,
            is_archive: false,
        }
    }

    /// Check whether the email carries a storage tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check whether the email carries a user label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Add a label unless it is already present.
    ///
    /// Returns `true` if the label was added.
    pub fn add_label(&mut self, label: &str) -> bool {
        if self.has_label(label) {
            return false;
        }
        self.labels.push(label.to_string());
        true
    }

    /// Remove a label.
    ///
    /// Returns `true` if the label was present.
    pub fn remove_label(&mut self, label: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l != label);
        self.labels.len() != before
    }

    /// Display string for the sender: "Name <address>" or just the address.
    #[must_use]
    pub fn sender_display(&self) -> String {
        if self.sender_name.is_empty() {
            self.sender_address.clone()
        } else if self.sender_address.is_empty() {
            self.sender_name.clone()
        } else {
            format!("{} <{}>", self.sender_name, self.sender_address)
        }
    }
}

impl From<String> for EmailId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_record_deserializes_with_defaults() {
        let email: Email = serde_json::from_str(r#"{"id":"7"}"#).unwrap();

        assert_eq!(email.id, EmailId::new("7"));
        assert!(email.labels.is_empty());
        assert!(email.tags.is_empty());
        assert!(email.subject.is_empty());
        assert!(!email.is_trash);
        assert_eq!(email.date, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let email: Email = serde_json::from_str(
            r#"{"id":"1","subject":null,"labels":null,"tags":null,"name":null,
                "text":null,"read":null,"isTrash":null,"date":null}"#,
        )
        .unwrap();

        assert!(email.subject.is_empty());
        assert!(email.sender_name.is_empty());
        assert!(email.body.is_empty());
        assert!(email.labels.is_empty());
        assert!(email.tags.is_empty());
        assert!(!email.read);
        assert!(!email.is_trash);
        assert_eq!(email.date, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_store_field_names_are_accepted() {
        let email: Email = serde_json::from_str(
            r#"{
                "id": "1",
                "name": "Orders",
                "email": "orders@amazon.com",
                "text": "Your order has shipped",
                "isTrash": true,
                "isArchive": false,
                "date": "2026-03-10T09:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(email.sender_name, "Orders");
        assert_eq!(email.sender_address, "orders@amazon.com");
        assert_eq!(email.body, "Your order has shipped");
        assert!(email.is_trash);
    }

    #[test]
    fn test_label_set_semantics() {
        let mut email = Email::new("1");

        assert!(email.add_label("work"));
        assert!(!email.add_label("work"));
        assert_eq!(email.labels, vec!["work".to_string()]);

        assert!(email.remove_label("work"));
        assert!(!email.remove_label("work"));
        assert!(email.labels.is_empty());
    }

    #[test]
    fn test_sender_display() {
        let mut email = Email::new("1");
        email.sender_address = "alice@example.com".to_string();
        assert_eq!(email.sender_display(), "alice@example.com");

        email.sender_name = "Alice".to_string();
        assert_eq!(email.sender_display(), "Alice <alice@example.com>");
    }
}
