//! Template validation.

use super::model::Template;

/// Validation error for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Template name is empty.
    EmptyName,
    /// Subject is empty.
    EmptySubject,
    /// Body is empty.
    EmptyBody,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Template name is required",
            Self::EmptySubject => "Template subject is required",
            Self::EmptyBody => "Template body is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptySubject => "subject",
            Self::EmptyBody => "body",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Validate a template.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_template(template: &Template) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if template.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if template.subject.trim().is_empty() {
        errors.push(ValidationError::EmptySubject);
    }
    if template.body.trim().is_empty() {
        errors.push(ValidationError::EmptyBody);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateCategory;

    #[test]
    fn test_blank_fields() {
        let template = Template::new(" ", "", "\n", TemplateCategory::General);
        assert_eq!(
            validate_template(&template),
            Err(vec![
                ValidationError::EmptyName,
                ValidationError::EmptySubject,
                ValidationError::EmptyBody,
            ])
        );
    }

    #[test]
    fn test_valid() {
        let template = Template::new("Thanks", "Thank you", "Much obliged.", TemplateCategory::Personal);
        assert_eq!(validate_template(&template), Ok(()));
    }
}
