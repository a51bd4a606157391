//! Category rule validation.

use regex::Regex;

use super::model::{CategoryRule, Operation};

/// Validation error for a category rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rule name is empty.
    EmptyName,
    /// Icon name is empty.
    EmptyIcon,
    /// Rule has no conditions.
    NoConditions,
    /// The regex condition at this index doesn't compile.
    InvalidRegex(usize),
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Category name is required",
            Self::EmptyIcon => "Category icon is required",
            Self::NoConditions => "At least one condition is required",
            Self::InvalidRegex(_) => "Regex condition is not a valid pattern",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyIcon => "icon",
            Self::NoConditions | Self::InvalidRegex(_) => "conditions",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRegex(index) => write!(f, "{} (condition {})", self.message(), index + 1),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a category rule.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate a category rule before it is stored.
///
/// The matcher accepts any rule; this only guards what gets persisted.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_rule(rule: &CategoryRule) -> ValidationResult {
    let mut errors = Vec::new();

    if rule.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if rule.icon.trim().is_empty() {
        errors.push(ValidationError::EmptyIcon);
    }

    if rule.conditions.is_empty() {
        errors.push(ValidationError::NoConditions);
    }
    for (index, condition) in rule.conditions.iter().enumerate() {
        if condition.operation == Operation::Regex && Regex::new(&condition.value).is_err() {
            errors.push(ValidationError::InvalidRegex(index));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
