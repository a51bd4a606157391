//! Category rule evaluation.
//!
//! A rule matches an email when any of its conditions matches. String
//! operations compare lowercase forms, except `regex`, which runs the pattern
//! as written against the raw field value. A pattern that fails to compile
//! only disables its own condition.

use std::collections::HashMap;

use regex::Regex;
use tracing::warn;

use super::model::{CategoryRule, Condition, ConditionKind, Operation};
use crate::mailbox::{Email, Folder};

/// Check whether an email belongs to a category.
///
/// Conditions are tried in order and evaluation stops at the first match.
/// A rule without conditions matches nothing.
#[must_use]
pub fn matches(email: &Email, rule: &CategoryRule) -> bool {
    rule.conditions
        .iter()
        .any(|condition| condition_matches(email, condition))
}

/// Check a single condition against an email.
#[must_use]
pub fn condition_matches(email: &Email, condition: &Condition) -> bool {
    match condition.kind {
        ConditionKind::Label => email.has_label(&condition.value),
        ConditionKind::Custom => false,
        kind => field(email, kind)
            .is_some_and(|field| compare(field, condition.operation, &condition.value)),
    }
}

/// The text field a condition kind reads. Labels and custom conditions have
/// none.
fn field(email: &Email, kind: ConditionKind) -> Option<&str> {
    match kind {
        ConditionKind::Sender => Some(email.sender_address.as_str()),
        ConditionKind::Subject => Some(email.subject.as_str()),
        ConditionKind::Content => Some(email.body.as_str()),
        ConditionKind::Label | ConditionKind::Custom => None,
    }
}

fn compare(field: &str, operation: Operation, value: &str) -> bool {
    let lower = || (field.to_lowercase(), value.to_lowercase());
    match operation {
        Operation::Contains => {
            let (field, value) = lower();
            field.contains(&value)
        }
        Operation::Equals => {
            let (field, value) = lower();
            field == value
        }
        Operation::StartsWith => {
            let (field, value) = lower();
            field.starts_with(&value)
        }
        Operation::EndsWith => {
            let (field, value) = lower();
            field.ends_with(&value)
        }
        Operation::Regex => compile_regex(value).is_some_and(|re| re.is_match(field)),
    }
}

fn compile_regex(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .inspect_err(|e| warn!(pattern, error = %e, "Invalid regex in category condition"))
        .ok()
}

/// A condition ready to run against many emails. Regex patterns are
/// compiled once, so a bad pattern is reported once per batch.
enum CompiledCondition<'a> {
    Plain(&'a Condition),
    Regex {
        kind: ConditionKind,
        regex: Option<Regex>,
    },
}

impl<'a> CompiledCondition<'a> {
    fn compile(condition: &'a Condition) -> Self {
        let reads_text = !matches!(condition.kind, ConditionKind::Label | ConditionKind::Custom);
        if condition.operation == Operation::Regex && reads_text {
            Self::Regex {
                kind: condition.kind,
                regex: compile_regex(&condition.value),
            }
        } else {
            Self::Plain(condition)
        }
    }

    fn matches(&self, email: &Email) -> bool {
        match self {
            Self::Plain(condition) => condition_matches(email, condition),
            Self::Regex { kind, regex } => regex
                .as_ref()
                .zip(field(email, *kind))
                .is_some_and(|(re, field)| re.is_match(field)),
        }
    }
}

fn compile_rule(rule: &CategoryRule) -> Vec<CompiledCondition<'_>> {
    rule.conditions.iter().map(CompiledCondition::compile).collect()
}

fn matches_compiled(email: &Email, conditions: &[CompiledCondition<'_>]) -> bool {
    conditions.iter().any(|condition| condition.matches(email))
}

/// Count, for each rule, how many inbox emails match it.
///
/// Only the inbox view is counted: drafts, junk, trashed and archived mail
/// never contribute, even when they match.
#[must_use]
pub fn category_counts(rules: &[CategoryRule], emails: &[Email]) -> HashMap<String, usize> {
    let inbox: Vec<&Email> = emails
        .iter()
        .filter(|email| Folder::Inbox.contains(email))
        .collect();

    rules
        .iter()
        .map(|rule| {
            let conditions = compile_rule(rule);
            let count = inbox
                .iter()
                .filter(|email| matches_compiled(email, &conditions))
                .count();
            (rule.id.clone(), count)
        })
        .collect()
}

/// Narrow a folder view to the emails matching one rule, preserving order.
#[must_use]
pub fn filter_by_category<'a>(emails: &[&'a Email], rule: &CategoryRule) -> Vec<&'a Email> {
    let conditions = compile_rule(rule);
    emails
        .iter()
        .copied()
        .filter(|email| matches_compiled(email, &conditions))
        .collect()
}
