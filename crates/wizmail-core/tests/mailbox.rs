//! End-to-end tests for the mailbox service.
//!
//! These run against an in-memory database and exercise storage,
//! folder views and category counts together.

#![allow(clippy::unwrap_used)]

use wizmail_core::{
    CategoryRule, Condition, ConditionKind, Email, EmailId, Error, Folder, Mailbox, Operation,
};

/// Records in the loose shape the store has historically used.
const FIXTURE: &str = r#"[
    {"id": "1", "name": "Amazon", "email": "orders@amazon.com", "subject": "Your order has shipped",
     "text": "Tracking inside.", "date": "2024-05-01T09:00:00Z", "read": false, "labels": [], "tags": []},
    {"id": "2", "name": "LinkedIn", "email": "noreply@linkedin.com", "subject": "New connection",
     "text": "Someone wants to connect.", "date": "2024-05-01T08:00:00Z", "read": true, "labels": [], "tags": []},
    {"id": "3", "subject": "Draft reply", "tags": ["draft"], "date": "2024-05-01T07:00:00Z"},
    {"id": "4", "email": "me@example.com", "subject": "Re: offsite", "tags": ["sent"], "read": true,
     "date": "2024-05-01T06:00:00Z"},
    {"id": "5", "email": "deals@spam.example", "subject": "Huge sale", "tags": ["junk"],
     "date": "2024-05-01T05:00:00Z"},
    {"id": "6", "email": "old@example.com", "subject": "Old thread", "isTrash": true,
     "date": "2024-05-01T04:00:00Z"},
    {"id": "7", "email": "old@example.com", "subject": "Kept", "isArchive": true,
     "date": "2024-05-01T03:00:00Z"},
    {"id": "8"}
]"#;

async fn seeded() -> Mailbox {
    let mailbox = Mailbox::in_memory().await.unwrap();
    let emails: Vec<Email> = serde_json::from_str(FIXTURE).unwrap();
    mailbox.emails().upsert_many(&emails).await.unwrap();
    mailbox.categories().seed_defaults().await.unwrap();
    mailbox
}

fn ids(emails: &[Email]) -> Vec<&str> {
    emails.iter().map(|e| e.id.as_str()).collect()
}

#[tokio::test]
async fn test_folder_views() {
    let mailbox = seeded().await;

    let inbox = mailbox.folder_view("inbox", None).await.unwrap();
    assert_eq!(ids(&inbox), vec!["1", "2", "4", "8"]);

    let drafts = mailbox.folder_view("draft", None).await.unwrap();
    assert_eq!(ids(&drafts), vec!["3"]);

    let sent = mailbox.folder_view("sent", None).await.unwrap();
    assert_eq!(ids(&sent), vec!["4"]);

    let junk = mailbox.folder_view("spam", None).await.unwrap();
    assert_eq!(ids(&junk), vec!["5"]);

    let trash = mailbox.folder_view("trash", None).await.unwrap();
    assert_eq!(ids(&trash), vec!["6"]);

    let archive = mailbox.folder_view("archive", None).await.unwrap();
    assert_eq!(ids(&archive), vec!["7"]);

    let everything = mailbox.folder_view("nonexistent-folder", None).await.unwrap();
    assert_eq!(everything.len(), 8);
}

#[tokio::test]
async fn test_category_counts_cover_inbox_only() {
    let mailbox = seeded().await;

    let counts = mailbox.category_counts().await.unwrap();
    assert_eq!(counts["shopping"], 1);
    assert_eq!(counts["social"], 1);
    // noreply@ sender
    assert_eq!(counts["updates"], 1);
    // "Huge sale" is junk, so it doesn't count.
    assert_eq!(counts["promotions"], 0);
    assert_eq!(counts["forums"], 0);
}

#[tokio::test]
async fn test_folder_view_filtered_by_category() {
    let mailbox = seeded().await;

    let social = mailbox.folder_view("inbox", Some("social")).await.unwrap();
    assert_eq!(ids(&social), vec!["2"]);

    // Junk mail matching a category stays out of the inbox view.
    let promotions = mailbox
        .folder_view("inbox", Some("promotions"))
        .await
        .unwrap();
    assert!(promotions.is_empty());
}

#[tokio::test]
async fn test_trash_archive_and_empty_trash() {
    let mailbox = seeded().await;
    let id = EmailId::new("1");

    mailbox.emails().set_trash(&id, true).await.unwrap();
    let counts = mailbox.folder_counts().await.unwrap();
    assert_eq!(counts.get(Folder::Trash).total, 2);
    assert_eq!(counts.get(Folder::Inbox).total, 3);

    mailbox.emails().set_trash(&id, false).await.unwrap();
    mailbox.emails().set_archive(&id, true).await.unwrap();
    let archive = mailbox.folder_view("archive", None).await.unwrap();
    assert_eq!(ids(&archive), vec!["1", "7"]);

    assert_eq!(mailbox.empty_trash().await.unwrap(), 1);
    assert!(mailbox.folder_view("trash", None).await.unwrap().is_empty());
    assert!(mailbox.emails().get(&EmailId::new("6")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_rule_with_regex_and_label() {
    let mailbox = seeded().await;
    let rule = CategoryRule::new(
        "Threads",
        vec![
            Condition::new(ConditionKind::Subject, Operation::Regex, "^Re: "),
            Condition::contains(ConditionKind::Label, "followup"),
        ],
    );
    mailbox.categories().save(&rule).await.unwrap();

    mailbox
        .emails()
        .add_label(&EmailId::new("2"), "followup")
        .await
        .unwrap();

    let view = mailbox.folder_view("inbox", Some(&rule.id)).await.unwrap();
    assert_eq!(ids(&view), vec!["2", "4"]);
}

#[tokio::test]
async fn test_invalid_rule_is_not_stored() {
    let mailbox = seeded().await;
    let rule = CategoryRule::new(
        "Broken",
        vec![Condition::new(ConditionKind::Subject, Operation::Regex, "(")],
    );

    let err = mailbox.categories().save(&rule).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(mailbox.categories().get(&rule.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_within_folder() {
    let mailbox = seeded().await;

    let page = mailbox
        .emails()
        .search("THREAD", None, 10, 0)
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let page = mailbox
        .emails()
        .search("o", Some(Folder::Inbox), 2, 1)
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(ids(&page.emails), vec!["2", "4"]);
}
