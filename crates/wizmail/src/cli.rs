//! Command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use wizmail_core::{AnalysisLevel, Condition, Folder, TaskPriority, TaskStatus, TemplateCategory};

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "wizmail", version, about = "Local webmail store with rule-based categories")]
pub struct Cli {
    /// Database file, overriding the settings file.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
    /// Emit JSON output.
    #[arg(long, global = true)]
    pub json: bool,
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import emails from a JSON array.
    Import(ImportArgs),
    /// List a folder, optionally narrowed to a category.
    List(ListArgs),
    /// Show one email.
    Show(IdArgs),
    /// Mark an email as read.
    Read(IdArgs),
    /// Mark an email as unread.
    Unread(IdArgs),
    /// Move an email to the trash.
    Trash(FlagArgs),
    /// Archive an email.
    Archive(FlagArgs),
    /// Add or remove labels.
    Label(LabelArgs),
    /// Permanently delete trashed emails.
    EmptyTrash,
    /// Search subjects and bodies.
    Search(SearchArgs),
    /// Folder and category counts.
    Counts,
    /// Run heuristic analysis on an email.
    Analyze(AnalyzeArgs),
    /// Summarize recent mail.
    Summary(SummaryArgs),
    /// Manage category rules.
    Category(CategoryArgs),
    /// Manage templates.
    Template(TemplateArgs),
    /// Manage tasks.
    Task(TaskArgs),
}

/// Arguments for `import`.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file containing an array of emails.
    pub file: PathBuf,
}

/// Arguments for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Folder name. Unknown names list every email.
    #[arg(long, default_value = "inbox")]
    pub folder: String,
    /// Category ID to narrow the folder to.
    #[arg(long)]
    pub category: Option<String>,
}

/// A single email ID.
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Email ID.
    pub id: String,
}

/// Arguments for `trash` and `archive`.
#[derive(Debug, Args)]
pub struct FlagArgs {
    /// Email ID.
    pub id: String,
    /// Clear the flag instead of setting it.
    #[arg(long)]
    pub undo: bool,
}

/// Arguments for `label`.
#[derive(Debug, Args)]
pub struct LabelArgs {
    /// Label operation.
    #[command(subcommand)]
    pub command: LabelCommand,
}

/// Label operations.
#[derive(Debug, Subcommand)]
pub enum LabelCommand {
    /// Add labels.
    Add(LabelMutateArgs),
    /// Remove labels.
    Rm(LabelMutateArgs),
}

/// Arguments for `label add` and `label rm`.
#[derive(Debug, Args)]
pub struct LabelMutateArgs {
    /// Email ID.
    pub id: String,
    /// Labels to add or remove.
    #[arg(required = true, num_args = 1..)]
    pub labels: Vec<String>,
}

/// Arguments for `search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for.
    pub query: String,
    /// Only return matches visible in this folder.
    #[arg(long)]
    pub folder: Option<Folder>,
    /// Page size. Defaults to the configured page size.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Results to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

/// Arguments for `analyze`.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Email ID.
    pub id: String,
    /// Heuristic depth. Defaults to the configured level.
    #[arg(long)]
    pub level: Option<AnalysisLevel>,
    /// Add the suggested labels to the email.
    #[arg(long)]
    pub apply: bool,
    /// Create tasks from the action items.
    #[arg(long)]
    pub tasks: bool,
}

/// Arguments for `summary`.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Length of the period, ending now.
    #[arg(long, default_value_t = 24)]
    pub hours: i64,
}

/// Arguments for `category`.
#[derive(Debug, Args)]
pub struct CategoryArgs {
    /// Category operation.
    #[command(subcommand)]
    pub command: CategoryCommand,
}

/// Category operations.
#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List rules with their inbox counts.
    Ls,
    /// Add or replace a rule.
    Add(CategoryAddArgs),
    /// Delete a rule.
    Rm {
        /// Category ID.
        id: String,
    },
    /// Insert the built-in rules into an empty store.
    Seed,
}

/// Arguments for `category add`.
#[derive(Debug, Args)]
pub struct CategoryAddArgs {
    /// Display name.
    pub name: String,
    /// Condition as `type:operation:value` (repeatable).
    #[arg(long = "condition", required = true, action = ArgAction::Append)]
    pub conditions: Vec<Condition>,
    /// Reuse an ID to replace an existing rule.
    #[arg(long)]
    pub id: Option<String>,
    /// Icon name.
    #[arg(long)]
    pub icon: Option<String>,
    /// Description.
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments for `template`.
#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Template operation.
    #[command(subcommand)]
    pub command: TemplateCommand,
}

/// Template operations.
#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// List templates, newest first.
    Ls {
        /// Only this category.
        #[arg(long)]
        category: Option<TemplateCategory>,
        /// Include shared templates.
        #[arg(long)]
        public: bool,
    },
    /// Create a template.
    Add(TemplateAddArgs),
    /// Delete a template.
    Rm {
        /// Template ID.
        id: String,
    },
    /// Store a new draft from a template.
    Draft {
        /// Template ID.
        id: String,
    },
}

/// Arguments for `template add`.
#[derive(Debug, Args)]
pub struct TemplateAddArgs {
    /// Display name.
    pub name: String,
    /// Subject line.
    #[arg(long)]
    pub subject: String,
    /// Body text.
    #[arg(long)]
    pub body: String,
    /// Category.
    #[arg(long, default_value = "general")]
    pub category: TemplateCategory,
    /// Share the template.
    #[arg(long)]
    pub public: bool,
}

/// Arguments for `task`.
#[derive(Debug, Args)]
pub struct TaskArgs {
    /// Task operation.
    #[command(subcommand)]
    pub command: TaskCommand,
}

/// Task operations.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List tasks, most pressing first.
    Ls(TaskListArgs),
    /// Create a task.
    Add(TaskAddArgs),
    /// Mark a task completed.
    Done {
        /// Task ID.
        id: i64,
    },
    /// Delete a task.
    Rm {
        /// Task ID.
        id: i64,
    },
}

/// Arguments for `task ls`.
#[derive(Debug, Args)]
pub struct TaskListArgs {
    /// Only this status.
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Only this priority.
    #[arg(long)]
    pub priority: Option<TaskPriority>,
    /// Page size. Defaults to the configured page size.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Tasks to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

/// Arguments for `task add`.
#[derive(Debug, Args)]
pub struct TaskAddArgs {
    /// Short title.
    pub title: String,
    /// Longer notes.
    #[arg(long)]
    pub description: Option<String>,
    /// Priority.
    #[arg(long, default_value = "medium")]
    pub priority: TaskPriority,
    /// Due date (RFC 3339).
    #[arg(long)]
    pub due: Option<DateTime<Utc>>,
    /// Email the task relates to.
    #[arg(long)]
    pub email: Option<String>,
}
