//! Category rule data models.

use serde::{Deserialize, Serialize};

/// Which part of an email a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    /// Sender email address.
    Sender,
    /// Subject line.
    Subject,
    /// Body text.
    Content,
    /// Membership of the value in the email's label set.
    Label,
    /// Reserved extension point. Never matches.
    Custom,
}

impl ConditionKind {
    /// All condition kinds.
    pub const ALL: [Self; 5] = [
        Self::Sender,
        Self::Subject,
        Self::Content,
        Self::Label,
        Self::Custom,
    ];

    /// Parse from the serialized name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sender" => Some(Self::Sender),
            "subject" => Some(Self::Subject),
            "content" => Some(Self::Content),
            "label" => Some(Self::Label),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Serialized name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::Subject => "subject",
            Self::Content => "content",
            Self::Label => "label",
            Self::Custom => "custom",
        }
    }
}

/// How a condition compares its value against the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Substring, case-insensitive.
    #[default]
    Contains,
    /// Whole-field equality, case-insensitive.
    Equals,
    /// Prefix, case-insensitive.
    StartsWith,
    /// Suffix, case-insensitive.
    EndsWith,
    /// Regular expression tested against the raw field (case-sensitive).
    Regex,
}

impl Operation {
    /// All operations.
    pub const ALL: [Self; 5] = [
        Self::Contains,
        Self::Equals,
        Self::StartsWith,
        Self::EndsWith,
        Self::Regex,
    ];

    /// Parse from the serialized name. Case and separators are ignored, so
    /// `ends_with` parses too.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "contains" => Some(Self::Contains),
            "equals" => Some(Self::Equals),
            "startswith" => Some(Self::StartsWith),
            "endswith" => Some(Self::EndsWith),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    /// Serialized name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Regex => "regex",
        }
    }
}

/// A single `{type, operation, value}` test against one email field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Field selector.
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    /// Value to compare against.
    #[serde(default)]
    pub value: String,
    /// Comparison. Ignored for `label` and `custom` conditions.
    #[serde(default)]
    pub operation: Operation,
}

impl Condition {
    /// Create a condition.
    #[must_use]
    pub fn new(kind: ConditionKind, operation: Operation, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            operation,
        }
    }

    /// Shorthand for a case-insensitive substring condition.
    #[must_use]
    pub fn contains(kind: ConditionKind, value: impl Into<String>) -> Self {
        Self::new(kind, Operation::Contains, value)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} \"{}\"",
            self.kind.as_str(),
            self.operation.as_str(),
            self.value
        )
    }
}

/// Parses `type:operation:value`. The value may itself contain `:`.
impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(kind), Some(operation), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected type:operation:value, got `{s}`"));
        };

        let kind =
            ConditionKind::parse(kind).ok_or_else(|| format!("unknown condition type `{kind}`"))?;
        let operation =
            Operation::parse(operation).ok_or_else(|| format!("unknown operation `{operation}`"))?;

        Ok(Self::new(kind, operation, value))
    }
}

/// A user-defined category: an OR of conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon name for navigation.
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Conditions; the rule matches when any one matches.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Icon used when a rule doesn't specify one.
pub const DEFAULT_ICON: &str = "Tag";

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl CategoryRule {
    /// Create a rule with a fresh random ID and the default icon.
    #[must_use]
    pub fn new(name: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            icon: default_icon(),
            description: String::new(),
            conditions,
        }
    }

    /// Set the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
