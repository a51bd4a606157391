//! Template management.

use wizmail_core::{Template, TemplateId};

use crate::cli::{TemplateAddArgs, TemplateCommand};
use crate::commands::mail::email_line;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, command: TemplateCommand) -> anyhow::Result<()> {
    match command {
        TemplateCommand::Ls { category, public } => {
            let templates = ctx.mailbox.templates().list(category, public).await?;
            let lines: Vec<String> = templates
                .iter()
                .map(|t| {
                    let shared = if t.is_public { " (shared)" } else { "" };
                    format!("{}  [{}] {}{shared}: {}", t.id, t.category, t.name, t.subject)
                })
                .collect();
            ctx.output.emit_lines(&lines, "0 templates", &templates)
        }
        TemplateCommand::Add(args) => add(ctx, args).await,
        TemplateCommand::Rm { id } => {
            let id = TemplateId::from(id.as_str());
            ctx.mailbox.templates().delete(&id).await?;
            ctx.output.emit(
                &format!("deleted template {id}"),
                &serde_json::json!({ "deleted": id }),
            )
        }
        TemplateCommand::Draft { id } => {
            let draft = ctx
                .mailbox
                .draft_from_template(&TemplateId::from(id.as_str()))
                .await?;
            ctx.output.emit(&email_line(&draft), &draft)
        }
    }
}

async fn add(ctx: &AppContext, args: TemplateAddArgs) -> anyhow::Result<()> {
    let mut template = Template::new(args.name, args.subject, args.body, args.category);
    template.is_public = args.public;

    ctx.mailbox.templates().create(&template).await?;
    ctx.output
        .emit(&format!("created template {}", template.id), &template)
}
