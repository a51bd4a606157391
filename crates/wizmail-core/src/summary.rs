//! Daily digest of mailbox activity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::mailbox::{Email, EmailId, Folder, TAG_SENT};

const TOP_SENDERS: usize = 5;
const SUBJECTS_PER_SENDER: usize = 3;
const MAX_ACTION_ITEMS: usize = 5;

/// Label counted as important.
pub const IMPORTANT_LABEL: &str = "important";

/// Mail counts within the period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    /// Labelled `important`.
    pub important: usize,
    /// Not yet read.
    pub unread: usize,
    /// Tagged `sent`.
    pub sent_by_me: usize,
}

/// A sender with the most mail in the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSender {
    /// Sender address, or the display name when the address is missing.
    pub sender: String,
    /// Emails from this sender.
    pub count: usize,
    /// Subjects of the newest few emails.
    pub subjects: Vec<String>,
}

/// Unread inbox mail that probably needs a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    /// Email ID.
    pub id: EmailId,
    /// Subject line.
    pub subject: String,
    /// Sender address.
    pub sender: String,
    /// When the email arrived.
    pub received_at: DateTime<Utc>,
}

/// Digest of the emails dated within `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Period start, inclusive.
    pub start: DateTime<Utc>,
    /// Period end, inclusive.
    pub end: DateTime<Utc>,
    /// Emails in the period.
    pub total_emails: usize,
    /// Breakdown counts.
    pub counts: SummaryCounts,
    /// Busiest senders, most mail first.
    pub top_senders: Vec<TopSender>,
    /// Unread inbox mail, newest first.
    pub action_items: Vec<ActionItem>,
}

fn sender_key(email: &Email) -> &str {
    if email.sender_address.is_empty() {
        &email.sender_name
    } else {
        &email.sender_address
    }
}

/// Summarize the emails dated within `[start, end]`.
#[must_use]
pub fn daily_summary(emails: &[Email], start: DateTime<Utc>, end: DateTime<Utc>) -> DailySummary {
    let mut period: Vec<&Email> = emails
        .iter()
        .filter(|email| email.date >= start && email.date <= end)
        .collect();
    period.sort_by(|a, b| b.date.cmp(&a.date));

    let counts = SummaryCounts {
        important: period
            .iter()
            .filter(|e| e.has_label(IMPORTANT_LABEL))
            .count(),
        unread: period.iter().filter(|e| !e.read).count(),
        sent_by_me: period.iter().filter(|e| e.has_tag(TAG_SENT)).count(),
    };

    let mut senders: Vec<TopSender> = Vec::new();
    for email in &period {
        let key = sender_key(email);
        let entry = if let Some(pos) = senders.iter().position(|s| s.sender == key) {
            &mut senders[pos]
        } else {
            senders.push(TopSender {
                sender: key.to_string(),
                count: 0,
                subjects: Vec::new(),
            });
            let last = senders.len() - 1;
            &mut senders[last]
        };
        entry.count += 1;
        if entry.subjects.len() < SUBJECTS_PER_SENDER {
            entry.subjects.push(email.subject.clone());
        }
    }
    senders.sort_by(|a, b| b.count.cmp(&a.count));
    senders.truncate(TOP_SENDERS);

    let action_items = period
        .iter()
        .filter(|e| !e.read && Folder::Inbox.contains(e))
        .take(MAX_ACTION_ITEMS)
        .map(|e| ActionItem {
            id: e.id.clone(),
            subject: e.subject.clone(),
            sender: e.sender_address.clone(),
            received_at: e.date,
        })
        .collect();

    DailySummary {
        start,
        end,
        total_emails: period.len(),
        counts,
        top_senders: senders,
        action_items,
    }
}
