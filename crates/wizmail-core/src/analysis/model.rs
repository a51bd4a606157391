//! Analysis options and results.

use serde::{Deserialize, Serialize};

/// How deep the heuristics go. Each level includes the ones below it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisLevel {
    /// Promotional markers, sentiment, finance/scheduling, keywords.
    Basic,
    /// Adds urgency, newsletter, work, shopping and social signals.
    #[default]
    Standard,
    /// Adds time sensitivity and request detection.
    Advanced,
}

impl AnalysisLevel {
    /// All levels, shallowest first.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Standard, Self::Advanced];

    /// Parse a level name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "standard" => Some(Self::Standard),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Level name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for AnalysisLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown analysis level: {s}"))
    }
}

/// Analysis settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Heuristic depth.
    pub level: AnalysisLevel,
    /// Produce a short body excerpt.
    pub include_summary: bool,
    /// Extract action items from the body.
    pub include_action_items: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            level: AnalysisLevel::Standard,
            include_summary: true,
            include_action_items: true,
        }
    }
}

impl AnalysisOptions {
    /// Default options at the given level.
    #[must_use]
    pub fn with_level(level: AnalysisLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

/// Overall tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// More positive than negative words.
    Positive,
    /// Balanced or no signal.
    #[default]
    Neutral,
    /// More negative than positive words.
    Negative,
}

/// Suggested handling priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default.
    #[default]
    Medium,
    /// Needs attention.
    High,
}

impl Sentiment {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl Priority {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Category assigned when no heuristic fires.
pub const GENERAL_CATEGORY: &str = "general";

/// Output of [`analyze`](super::analyze).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Labels suggested for the email, in the order they were detected.
    pub auto_labels: Vec<String>,
    /// Overall tone.
    pub sentiment: Sentiment,
    /// Suggested priority.
    pub priority: Priority,
    /// Coarse category such as `finance` or `shopping`.
    pub category: String,
    /// Body excerpt. Empty unless requested.
    pub summary: String,
    /// Lines that ask for something. Empty unless requested.
    pub action_items: Vec<String>,
    /// Whether the email looks important.
    pub important: bool,
    /// Whether the email looks like spam.
    pub spam: bool,
    /// Most frequent long words.
    pub keywords: Vec<String>,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            auto_labels: Vec::new(),
            sentiment: Sentiment::Neutral,
            priority: Priority::Medium,
            category: GENERAL_CATEGORY.to_string(),
            summary: String::new(),
            action_items: Vec::new(),
            important: false,
            spam: false,
            keywords: Vec::new(),
        }
    }
}

impl AnalysisResult {
    pub(super) fn label(&mut self, label: &str) {
        if !self.auto_labels.iter().any(|l| l == label) {
            self.auto_labels.push(label.to_string());
        }
    }
}
