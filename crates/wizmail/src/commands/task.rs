//! Task management.

use wizmail_core::{EmailId, Task, TaskPatch, TaskStatus};

use crate::cli::{TaskAddArgs, TaskCommand, TaskListArgs};
use crate::context::AppContext;

fn task_line(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!(
        "#{:<5} {:<8} {:<12} {}{due}",
        task.id, task.priority, task.status, task.title
    )
}

pub async fn run(ctx: &AppContext, command: TaskCommand) -> anyhow::Result<()> {
    match command {
        TaskCommand::Ls(args) => list(ctx, args).await,
        TaskCommand::Add(args) => add(ctx, args).await,
        TaskCommand::Done { id } => {
            let patch = TaskPatch {
                status: Some(TaskStatus::Completed),
                ..TaskPatch::default()
            };
            let task = ctx.mailbox.tasks().update(id, patch).await?;
            ctx.output.emit(&task_line(&task), &task)
        }
        TaskCommand::Rm { id } => {
            ctx.mailbox.tasks().delete(id).await?;
            ctx.output
                .emit(&format!("deleted task #{id}"), &serde_json::json!({ "deleted": id }))
        }
    }
}

async fn list(ctx: &AppContext, args: TaskListArgs) -> anyhow::Result<()> {
    let limit = args.limit.unwrap_or(ctx.settings.page_size);
    let page = ctx
        .mailbox
        .tasks()
        .list(args.status, args.priority, limit, args.offset)
        .await?;

    let mut lines: Vec<String> = page.tasks.iter().map(task_line).collect();
    if page.total > page.tasks.len() {
        lines.push(format!("{} of {} tasks", page.tasks.len(), page.total));
    }
    ctx.output.emit_lines(&lines, "0 tasks", &page)
}

async fn add(ctx: &AppContext, args: TaskAddArgs) -> anyhow::Result<()> {
    let mut task = Task::new(args.title).with_priority(args.priority);
    if let Some(description) = args.description {
        task = task.with_description(description);
    }
    if let Some(due) = args.due {
        task = task.with_due_date(due);
    }
    if let Some(email) = args.email {
        let email = EmailId::new(email);
        ctx.mailbox.emails().require(&email).await?;
        task = task.for_email(email);
    }

    let task = ctx.mailbox.tasks().create(&task).await?;
    ctx.output.emit(&task_line(&task), &task)
}
