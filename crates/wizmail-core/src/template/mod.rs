//! Reusable email templates.

mod model;
mod repository;
mod validation;

pub use model::{Template, TemplateCategory, TemplateId};
pub use repository::TemplateRepository;
pub use validation::{ValidationError, validate_template};
