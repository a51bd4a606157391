//! Command handlers.

mod analyze;
mod category;
mod mail;
mod task;
mod template;

use crate::cli::{CategoryArgs, Command, LabelArgs, TaskArgs, TemplateArgs};
use crate::context::AppContext;

/// Run one subcommand against an open context.
///
/// # Errors
///
/// Returns an error if the command fails.
pub async fn dispatch(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Import(args) => mail::import(ctx, &args.file).await,
        Command::List(args) => mail::list(ctx, args).await,
        Command::Show(args) => mail::show(ctx, &args.id).await,
        Command::Read(args) => mail::set_read(ctx, &args.id, true).await,
        Command::Unread(args) => mail::set_read(ctx, &args.id, false).await,
        Command::Trash(args) => mail::trash(ctx, args).await,
        Command::Archive(args) => mail::archive(ctx, args).await,
        Command::Label(LabelArgs { command }) => mail::label(ctx, command).await,
        Command::EmptyTrash => mail::empty_trash(ctx).await,
        Command::Search(args) => mail::search(ctx, args).await,
        Command::Counts => mail::counts(ctx).await,
        Command::Analyze(args) => analyze::analyze(ctx, args).await,
        Command::Summary(args) => analyze::summary(ctx, args).await,
        Command::Category(CategoryArgs { command }) => category::run(ctx, command).await,
        Command::Template(TemplateArgs { command }) => template::run(ctx, command).await,
        Command::Task(TaskArgs { command }) => task::run(ctx, command).await,
    }
}
