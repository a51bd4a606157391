//! Argument parsing and command dispatch against an in-memory mailbox.

#![allow(clippy::unwrap_used)]

use clap::Parser;
use wizmail::cli::{CategoryCommand, Cli, Command, LabelCommand, TaskCommand, TemplateCommand};
use wizmail::commands::dispatch;
use wizmail::context::AppContext;
use wizmail::output::{Output, OutputMode};
use wizmail::settings::Settings;
use wizmail_core::{
    AnalysisLevel, ConditionKind, Email, EmailId, Folder, Mailbox, Operation, TaskPriority,
    TaskStatus, TemplateCategory,
};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("wizmail").chain(args.iter().copied())).unwrap()
}

async fn context() -> AppContext {
    let mailbox = Mailbox::in_memory().await.unwrap();
    AppContext::with_mailbox(mailbox, Settings::default(), Output::new(true))
}

async fn run(ctx: &AppContext, args: &[&str]) -> anyhow::Result<()> {
    dispatch(ctx, parse(args).command).await
}

fn email(id: &str, sender: &str, subject: &str, body: &str) -> Email {
    let mut email = Email::new(id);
    email.sender_address = sender.to_string();
    email.subject = subject.to_string();
    email.body = body.to_string();
    email
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["counts", "--json", "--database", "/tmp/mail.db"]);
    assert!(cli.json);
    assert_eq!(cli.database.unwrap().to_str(), Some("/tmp/mail.db"));
    assert!(matches!(cli.command, Command::Counts));
}

#[test]
fn test_list_defaults_to_inbox() {
    let Command::List(args) = parse(&["list"]).command else {
        panic!("expected list");
    };
    assert_eq!(args.folder, "inbox");
    assert!(args.category.is_none());
}

#[test]
fn test_search_folder_accepts_aliases() {
    let Command::Search(args) = parse(&["search", "invoice", "--folder", "spam"]).command else {
        panic!("expected search");
    };
    assert_eq!(args.query, "invoice");
    assert_eq!(args.folder, Some(Folder::Junk));
    assert_eq!(args.offset, 0);

    assert!(Cli::try_parse_from(["wizmail", "search", "x", "--folder", "outbox"]).is_err());
}

#[test]
fn test_category_conditions_parse() {
    let cli = parse(&[
        "category",
        "add",
        "Work",
        "--condition",
        "sender:ends_with:@corp.example",
        "--condition",
        "subject:regex:^\\[JIRA\\]: .*",
    ]);
    let Command::Category(args) = cli.command else {
        panic!("expected category");
    };
    let CategoryCommand::Add(add) = args.command else {
        panic!("expected add");
    };

    assert_eq!(add.name, "Work");
    assert_eq!(add.conditions.len(), 2);
    assert_eq!(add.conditions[0].kind, ConditionKind::Sender);
    assert_eq!(add.conditions[0].operation, Operation::EndsWith);
    assert_eq!(add.conditions[1].operation, Operation::Regex);
    assert_eq!(add.conditions[1].value, "^\\[JIRA\\]: .*");
}

#[test]
fn test_category_add_requires_a_condition() {
    assert!(Cli::try_parse_from(["wizmail", "category", "add", "Work"]).is_err());
    assert!(
        Cli::try_parse_from(["wizmail", "category", "add", "Work", "--condition", "sender"])
            .is_err()
    );
}

#[test]
fn test_label_requires_labels() {
    assert!(Cli::try_parse_from(["wizmail", "label", "add", "42"]).is_err());

    let Command::Label(args) = parse(&["label", "rm", "42", "a", "b"]).command else {
        panic!("expected label");
    };
    let LabelCommand::Rm(rm) = args.command else {
        panic!("expected rm");
    };
    assert_eq!(rm.labels, vec!["a", "b"]);
}

#[test]
fn test_typed_enums_parse() {
    let Command::Analyze(args) = parse(&["analyze", "1", "--level", "advanced", "--tasks"]).command
    else {
        panic!("expected analyze");
    };
    assert_eq!(args.level, Some(AnalysisLevel::Advanced));
    assert!(args.tasks);
    assert!(!args.apply);

    let Command::Template(args) = parse(&["template", "ls", "--category", "follow-up"]).command
    else {
        panic!("expected template");
    };
    let TemplateCommand::Ls { category, public } = args.command else {
        panic!("expected ls");
    };
    assert_eq!(category, Some(TemplateCategory::FollowUp));
    assert!(!public);

    let Command::Task(args) =
        parse(&["task", "ls", "--status", "in-progress", "--priority", "urgent"]).command
    else {
        panic!("expected task");
    };
    let TaskCommand::Ls(ls) = args.command else {
        panic!("expected ls");
    };
    assert_eq!(ls.status, Some(TaskStatus::InProgress));
    assert_eq!(ls.priority, Some(TaskPriority::Urgent));
}

#[test]
fn test_task_due_date_parses_rfc3339() {
    let Command::Task(args) = parse(&["task", "add", "Pay", "--due", "2024-06-01T12:00:00Z"]).command
    else {
        panic!("expected task");
    };
    let TaskCommand::Add(add) = args.command else {
        panic!("expected add");
    };
    assert_eq!(add.priority, TaskPriority::Medium);
    assert_eq!(add.due.unwrap().to_rfc3339(), "2024-06-01T12:00:00+00:00");

    assert!(Cli::try_parse_from(["wizmail", "task", "add", "Pay", "--due", "tomorrow"]).is_err());
}

#[tokio::test]
async fn test_flag_commands_update_store() {
    let ctx = context().await;
    assert_eq!(ctx.output.mode(), OutputMode::Json);
    ctx.mailbox
        .emails()
        .upsert(&email("1", "a@example.com", "Hello", "Hi"))
        .await
        .unwrap();

    run(&ctx, &["read", "1"]).await.unwrap();
    run(&ctx, &["label", "add", "1", "work", "urgent"]).await.unwrap();
    run(&ctx, &["label", "rm", "1", "urgent"]).await.unwrap();
    run(&ctx, &["archive", "1"]).await.unwrap();

    let stored = ctx.mailbox.emails().require(&EmailId::new("1")).await.unwrap();
    assert!(stored.read);
    assert!(stored.is_archive);
    assert_eq!(stored.labels, vec!["work"]);

    run(&ctx, &["archive", "1", "--undo"]).await.unwrap();
    run(&ctx, &["trash", "1"]).await.unwrap();
    run(&ctx, &["empty-trash"]).await.unwrap();
    assert!(
        ctx.mailbox
            .emails()
            .get(&EmailId::new("1"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_missing_email_is_an_error() {
    let ctx = context().await;
    let err = run(&ctx, &["show", "nope"]).await.unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[tokio::test]
async fn test_category_add_then_list() {
    let ctx = context().await;
    run(&ctx, &["category", "seed"]).await.unwrap();
    run(
        &ctx,
        &[
            "category",
            "add",
            "Work",
            "--id",
            "work",
            "--condition",
            "sender:ends_with:@corp.example",
        ],
    )
    .await
    .unwrap();
    run(&ctx, &["category", "ls"]).await.unwrap();

    let rule = ctx.mailbox.categories().require("work").await.unwrap();
    assert_eq!(rule.name, "Work");
    assert_eq!(rule.conditions.len(), 1);

    let err = run(
        &ctx,
        &["category", "add", "Bad", "--condition", "subject:regex:("],
    )
    .await;
    assert!(err.is_err());

    run(&ctx, &["category", "rm", "work"]).await.unwrap();
    assert!(ctx.mailbox.categories().get("work").await.unwrap().is_none());
}

#[tokio::test]
async fn test_analyze_creates_tasks() {
    let ctx = context().await;
    ctx.mailbox
        .emails()
        .upsert(&email(
            "1",
            "boss@corp.example",
            "Quarterly report",
            "Please send the numbers by Friday.\nThanks",
        ))
        .await
        .unwrap();

    run(&ctx, &["analyze", "1", "--tasks"]).await.unwrap();

    let page = ctx.mailbox.tasks().list(None, None, 10, 0).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.tasks[0].email_id, Some(EmailId::new("1")));

    let id = page.tasks[0].id.to_string();
    run(&ctx, &["task", "done", &id]).await.unwrap();
    let done = ctx.mailbox.tasks().get(page.tasks[0].id).await.unwrap().unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_template_draft_lands_in_drafts() {
    let ctx = context().await;
    run(
        &ctx,
        &[
            "template",
            "add",
            "Thanks",
            "--subject",
            "Thank you",
            "--body",
            "Much appreciated.",
        ],
    )
    .await
    .unwrap();

    let templates = ctx.mailbox.templates().list(None, false).await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].category, TemplateCategory::General);

    let id = templates[0].id.to_string();
    run(&ctx, &["template", "draft", &id]).await.unwrap();

    let drafts = ctx.mailbox.folder_view("draft", None).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].subject, "Thank you");
}

#[tokio::test]
async fn test_import_reads_json_file() {
    let ctx = context().await;
    let path = std::env::temp_dir().join(format!("wizmail-import-{}.json", std::process::id()));
    tokio::fs::write(
        &path,
        r#"[{"id": "a", "email": "x@example.com", "subject": "One"},
            {"id": "b", "email": "y@example.com", "subject": "Two", "tags": ["sent"],
             "labels": null, "text": null}]"#,
    )
    .await
    .unwrap();

    let result = run(&ctx, &["import", path.to_str().unwrap()]).await;
    tokio::fs::remove_file(&path).await.unwrap();
    result.unwrap();

    assert_eq!(ctx.mailbox.emails().list().await.unwrap().len(), 2);
    run(&ctx, &["counts"]).await.unwrap();
    run(&ctx, &["summary", "--hours", "48"]).await.unwrap();
}

#[tokio::test]
async fn test_summary_with_huge_period_is_an_error() {
    let ctx = context().await;
    let huge = (i64::MAX / 1000).to_string();
    let err = run(&ctx, &["summary", "--hours", &huge]).await.unwrap_err();
    assert!(err.to_string().contains("out of range"));
}
