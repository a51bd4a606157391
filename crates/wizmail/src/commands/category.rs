//! Category rule management.

use serde::Serialize;
use tracing::info;
use wizmail_core::CategoryRule;

use crate::cli::{CategoryAddArgs, CategoryCommand};
use crate::context::AppContext;

#[derive(Serialize)]
struct RuleWithCount {
    #[serde(flatten)]
    rule: CategoryRule,
    count: usize,
}

pub async fn run(ctx: &AppContext, command: CategoryCommand) -> anyhow::Result<()> {
    match command {
        CategoryCommand::Ls => list(ctx).await,
        CategoryCommand::Add(args) => add(ctx, args).await,
        CategoryCommand::Rm { id } => {
            ctx.mailbox.categories().delete(&id).await?;
            info!(category = %id, "Deleted category");
            ctx.output
                .emit(&format!("deleted category {id}"), &serde_json::json!({ "deleted": id }))
        }
        CategoryCommand::Seed => {
            let inserted = ctx.mailbox.categories().seed_defaults().await?;
            ctx.output.emit(
                &format!("inserted {inserted} built-in categories"),
                &serde_json::json!({ "inserted": inserted }),
            )
        }
    }
}

async fn list(ctx: &AppContext) -> anyhow::Result<()> {
    let counts = ctx.mailbox.category_counts().await?;
    let rules: Vec<RuleWithCount> = ctx
        .mailbox
        .categories()
        .list()
        .await?
        .into_iter()
        .map(|rule| RuleWithCount {
            count: counts.get(&rule.id).copied().unwrap_or_default(),
            rule,
        })
        .collect();

    let mut lines = Vec::new();
    for entry in &rules {
        lines.push(format!(
            "{:<14} {:<16} {:>5}  {}",
            entry.rule.id, entry.rule.name, entry.count, entry.rule.description
        ));
        for condition in &entry.rule.conditions {
            lines.push(format!("    {condition}"));
        }
    }

    ctx.output.emit_lines(&lines, "0 categories", &rules)
}

async fn add(ctx: &AppContext, args: CategoryAddArgs) -> anyhow::Result<()> {
    let mut rule = CategoryRule::new(args.name, args.conditions);
    if let Some(id) = args.id {
        rule.id = id;
    }
    if let Some(icon) = args.icon {
        rule = rule.with_icon(icon);
    }
    if let Some(description) = args.description {
        rule = rule.with_description(description);
    }

    ctx.mailbox.categories().save(&rule).await?;
    info!(category = %rule.id, "Saved category");

    ctx.output
        .emit(&format!("saved category {} ({})", rule.id, rule.name), &rule)
}
