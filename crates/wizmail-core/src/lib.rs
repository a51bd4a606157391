//! # wizmail-core
//!
//! Core business logic for the `wizmail` client.
//!
//! This crate provides:
//! - **Folder views** - partition a flat mailbox into inbox, drafts, sent,
//!   junk, trash and archive from tags and flags
//! - **Category rules** - user-defined predicates (sender, subject, content,
//!   label) that group inbox mail and drive navigation badges
//! - **Heuristic analysis** - keyword based labels, priority and sentiment
//! - **Daily summary** - per-period digest of the mailbox
//! - **Templates and tasks** - reusable drafts and follow-ups
//! - **Local storage** (`SQLite`) for all of the above
//!
//! The classifier and matcher are pure functions over borrowed slices; the
//! repositories own persistence and the [`Mailbox`] service wires them
//! together.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod category;
mod error;
pub mod mailbox;
pub mod service;
pub mod summary;
pub mod task;
pub mod template;

pub use analysis::{AnalysisLevel, AnalysisOptions, AnalysisResult, Priority, Sentiment, analyze};
pub use category::{
    CategoryRepository, CategoryRule, Condition, ConditionKind, Operation, category_counts,
    filter_by_category, matches, validate_rule,
};
pub use error::{Error, Result};
pub use mailbox::{
    Email, EmailId, EmailRepository, Folder, FolderCounts, SearchPage, classify, classify_folder,
    folder_counts,
};
pub use service::Mailbox;
pub use summary::{DailySummary, daily_summary};
pub use task::{Task, TaskPatch, TaskPriority, TaskRepository, TaskStatus};
pub use template::{Template, TemplateCategory, TemplateId, TemplateRepository};
