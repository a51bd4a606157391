//! Email commands: import, listing, flags, labels and search.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;
use wizmail_core::{Email, EmailId, Folder};

use crate::cli::{FlagArgs, LabelCommand, LabelMutateArgs, ListArgs, SearchArgs};
use crate::context::AppContext;

/// One line per email: unread marker, ID, date, sender, subject.
pub(crate) fn email_line(email: &Email) -> String {
    let marker = if email.read { ' ' } else { '*' };
    format!(
        "{marker} {:<12} {}  {:<32}  {}",
        email.id,
        email.date.format("%Y-%m-%d %H:%M"),
        email.sender_display(),
        email.subject
    )
}

pub async fn import(ctx: &AppContext, file: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let emails: Vec<Email> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing emails in {}", file.display()))?;

    let count = ctx.mailbox.emails().upsert_many(&emails).await?;
    info!(count, file = %file.display(), "Imported emails");

    #[derive(Serialize)]
    struct Imported {
        imported: usize,
    }
    ctx.output.emit(
        &format!("imported {count} emails"),
        &Imported { imported: count },
    )
}

pub async fn list(ctx: &AppContext, args: ListArgs) -> anyhow::Result<()> {
    let emails = ctx
        .mailbox
        .folder_view(&args.folder, args.category.as_deref())
        .await?;

    let lines: Vec<String> = emails.iter().map(email_line).collect();
    ctx.output.emit_lines(&lines, "0 emails", &emails)
}

pub async fn show(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let email = ctx.mailbox.emails().require(&EmailId::new(id)).await?;

    let mut text = format!(
        "ID:      {}\nFrom:    {}\nDate:    {}\nSubject: {}\n",
        email.id,
        email.sender_display(),
        email.date.to_rfc3339(),
        email.subject
    );
    if !email.labels.is_empty() {
        text.push_str(&format!("Labels:  {}\n", email.labels.join(", ")));
    }
    let folders: Vec<&str> = Folder::ALL
        .iter()
        .filter(|f| f.contains(&email))
        .map(Folder::as_str)
        .collect();
    text.push_str(&format!("Folders: {}\n\n{}", folders.join(", "), email.body));

    ctx.output.emit(&text, &email)
}

pub async fn set_read(ctx: &AppContext, id: &str, read: bool) -> anyhow::Result<()> {
    let id = EmailId::new(id);
    if read {
        ctx.mailbox.emails().mark_read(&id).await?;
    } else {
        ctx.mailbox.emails().mark_unread(&id).await?;
    }

    let state = if read { "read" } else { "unread" };
    emit_email(ctx, &id, &format!("marked {id} {state}")).await
}

pub async fn trash(ctx: &AppContext, args: FlagArgs) -> anyhow::Result<()> {
    let id = EmailId::new(args.id);
    ctx.mailbox.emails().set_trash(&id, !args.undo).await?;

    let text = if args.undo {
        format!("restored {id} from trash")
    } else {
        format!("moved {id} to trash")
    };
    emit_email(ctx, &id, &text).await
}

pub async fn archive(ctx: &AppContext, args: FlagArgs) -> anyhow::Result<()> {
    let id = EmailId::new(args.id);
    ctx.mailbox.emails().set_archive(&id, !args.undo).await?;

    let text = if args.undo {
        format!("unarchived {id}")
    } else {
        format!("archived {id}")
    };
    emit_email(ctx, &id, &text).await
}

async fn emit_email(ctx: &AppContext, id: &EmailId, text: &str) -> anyhow::Result<()> {
    let email = ctx.mailbox.emails().require(id).await?;
    ctx.output.emit(text, &email)
}

pub async fn label(ctx: &AppContext, command: LabelCommand) -> anyhow::Result<()> {
    match command {
        LabelCommand::Add(LabelMutateArgs { id, labels }) => {
            let email = ctx
                .mailbox
                .emails()
                .add_labels(&EmailId::new(id), &labels)
                .await?;
            ctx.output
                .emit(&format!("labels on {}: {}", email.id, email.labels.join(", ")), &email)
        }
        LabelCommand::Rm(LabelMutateArgs { id, labels }) => {
            let id = EmailId::new(id);
            let mut email = ctx.mailbox.emails().require(&id).await?;
            for label in &labels {
                email = ctx.mailbox.emails().remove_label(&id, label).await?;
            }
            ctx.output
                .emit(&format!("labels on {}: {}", email.id, email.labels.join(", ")), &email)
        }
    }
}

pub async fn empty_trash(ctx: &AppContext) -> anyhow::Result<()> {
    let removed = ctx.mailbox.empty_trash().await?;

    #[derive(Serialize)]
    struct Removed {
        removed: u64,
    }
    ctx.output
        .emit(&format!("removed {removed} emails"), &Removed { removed })
}

pub async fn search(ctx: &AppContext, args: SearchArgs) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(ctx.settings.page_size);
    let page = ctx
        .mailbox
        .emails()
        .search(&args.query, args.folder, limit, args.offset)
        .await?;

    let mut lines: Vec<String> = page.emails.iter().map(email_line).collect();
    if !lines.is_empty() {
        lines.push(format!(
            "{}-{} of {}",
            page.offset + 1,
            page.offset as usize + page.emails.len(),
            page.total
        ));
    }
    ctx.output.emit_lines(&lines, "0 matches", &page)
}

#[derive(Serialize)]
struct FolderRow {
    folder: Folder,
    total: usize,
    unread: usize,
}

#[derive(Serialize)]
struct CategoryRow {
    id: String,
    name: String,
    count: usize,
}

#[derive(Serialize)]
struct CountsReport {
    folders: Vec<FolderRow>,
    categories: Vec<CategoryRow>,
}

pub async fn counts(ctx: &AppContext) -> anyhow::Result<()> {
    let folder_counts = ctx.mailbox.folder_counts().await?;
    let category_counts = ctx.mailbox.category_counts().await?;
    let rules = ctx.mailbox.categories().list().await?;

    let report = CountsReport {
        folders: folder_counts
            .iter()
            .map(|(folder, count)| FolderRow {
                folder,
                total: count.total,
                unread: count.unread,
            })
            .collect(),
        categories: rules
            .into_iter()
            .map(|rule| CategoryRow {
                count: category_counts.get(&rule.id).copied().unwrap_or_default(),
                id: rule.id,
                name: rule.name,
            })
            .collect(),
    };

    let mut lines: Vec<String> = report
        .folders
        .iter()
        .map(|row| {
            format!(
                "{:<10} {:>5} ({} unread)",
                row.folder.display_name(),
                row.total,
                row.unread
            )
        })
        .collect();
    for row in &report.categories {
        lines.push(format!("  {:<16} {:>5}", row.name, row.count));
    }

    ctx.output.emit_lines(&lines, "", &report)
}
