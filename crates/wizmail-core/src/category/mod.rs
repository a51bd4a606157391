//! User-defined categories.
//!
//! A category is a named OR of conditions over an email's sender, subject,
//! body or labels. Categories group inbox mail and drive the navigation
//! badges.

mod builtin;
mod matcher;
mod model;
mod repository;
mod validation;

pub use builtin::builtin_categories;
pub use matcher::{category_counts, condition_matches, filter_by_category, matches};
pub use model::{CategoryRule, Condition, ConditionKind, DEFAULT_ICON, Operation};
pub use repository::CategoryRepository;
pub use validation::{ValidationError, ValidationResult, validate_rule};
