//! Follow-up tasks, optionally linked to emails.

mod model;
mod repository;
mod validation;

pub use model::{Task, TaskPage, TaskPatch, TaskPriority, TaskStatus};
pub use repository::TaskRepository;
pub use validation::{ValidationError, validate_task};
