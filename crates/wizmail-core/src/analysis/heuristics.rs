//! Keyword heuristics.
//!
//! Everything here is deterministic: the same email and options always give
//! the same result.

use super::model::{AnalysisLevel, AnalysisOptions, AnalysisResult, Priority, Sentiment};
use crate::mailbox::Email;

const PROMOTIONAL_MARKERS: &[&str] = &[
    "unsubscribe",
    "click here",
    "limited time",
    "special offer",
    "buy now",
];

/// Promotional mail is only flagged as spam past this many markers.
const SPAM_MARKER_THRESHOLD: usize = 3;

const POSITIVE_WORDS: &[&str] = &["thank", "good", "great", "excellent", "appreciate", "happy"];
const NEGATIVE_WORDS: &[&str] = &[
    "sorry",
    "issue",
    "problem",
    "complaint",
    "concern",
    "wrong",
    "bad",
];

const FINANCE_WORDS: &[&str] = &["invoice", "payment", "receipt"];
const SCHEDULING_WORDS: &[&str] = &["meeting", "schedule", "calendar"];
const URGENCY_WORDS: &[&str] = &["urgent", "asap", "important", "deadline"];
const NEWSLETTER_WORDS: &[&str] = &["newsletter", "update"];
const WORK_WORDS: &[&str] = &["team", "project"];
const SHOPPING_WORDS: &[&str] = &["order", "shipping", "delivery"];
const SOCIAL_SENDERS: &[&str] = &["linkedin", "facebook", "twitter"];
const TIME_WORDS: &[&str] = &["today", "tomorrow", "asap", "soon", "week", "month"];
const REQUEST_PHRASES: &[&str] = &["can you", "could you", "please", "help", "need"];
const ACTION_PHRASES: &[&str] = &["please", "could you", "need to"];
const BULLET_PREFIXES: &[&str] = &["• ", "- ", "* "];

const MAX_KEYWORDS: usize = 5;
const MIN_KEYWORD_CHARS: usize = 5;
const SUMMARY_CHARS: usize = 100;
const MAX_ACTION_ITEMS: usize = 3;

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

fn count_present(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|word| text.contains(*word)).count()
}

/// Analyze an email with keyword heuristics.
#[must_use]
pub fn analyze(email: &Email, options: &AnalysisOptions) -> AnalysisResult {
    let text = format!("{} {}", email.subject, email.body).to_lowercase();
    let mut result = AnalysisResult::default();

    basic(&text, &mut result);
    if options.level >= AnalysisLevel::Standard {
        standard(email, &text, &mut result);
    }
    if options.level >= AnalysisLevel::Advanced {
        advanced(&text, &mut result);
    }

    if options.include_summary {
        result.summary = summarize(&email.body);
    }
    if options.include_action_items {
        result.action_items = action_items(&email.body);
    }

    result
}

fn basic(text: &str, result: &mut AnalysisResult) {
    let markers = count_present(text, PROMOTIONAL_MARKERS);
    if markers > 0 {
        result.label("promotional");
        result.spam = markers >= SPAM_MARKER_THRESHOLD;
    }

    let positive = count_present(text, POSITIVE_WORDS);
    let negative = count_present(text, NEGATIVE_WORDS);
    result.sentiment = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };

    if contains_any(text, FINANCE_WORDS) {
        result.category = "finance".to_string();
        result.label("finance");
    } else if contains_any(text, SCHEDULING_WORDS) {
        result.category = "scheduling".to_string();
        result.label("meeting");
    }

    result.keywords = keywords(text);
}

fn standard(email: &Email, text: &str, result: &mut AnalysisResult) {
    if contains_any(text, URGENCY_WORDS) {
        result.priority = Priority::High;
        result.important = true;
        result.label("urgent");
    }

    if contains_any(text, NEWSLETTER_WORDS) {
        result.label("newsletter");
    }
    if contains_any(text, WORK_WORDS) {
        result.label("work");
    }

    if contains_any(text, SHOPPING_WORDS) {
        result.category = "shopping".to_string();
        result.label("order");
    } else if contains_any(&email.sender_name.to_lowercase(), SOCIAL_SENDERS) {
        result.category = "social".to_string();
        result.label("social");
    }
}

fn advanced(text: &str, result: &mut AnalysisResult) {
    if contains_any(text, TIME_WORDS) {
        result.label("time-sensitive");
    }
    if contains_any(text, REQUEST_PHRASES) || text.contains('?') {
        result.label("request");
    }
}

/// Most frequent words longer than four characters, ties by first occurrence.
fn keywords(text: &str) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for raw in text.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if word.chars().count() < MIN_KEYWORD_CHARS {
            continue;
        }
        match counts.iter_mut().find(|(w, _)| *w == word) {
            Some((_, count)) => *count += 1,
            None => counts.push((word, 1)),
        }
    }

    // Stable sort keeps first-occurrence order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

fn summarize(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() > SUMMARY_CHARS {
        let excerpt: String = body.chars().take(SUMMARY_CHARS).collect();
        format!("{excerpt}...")
    } else {
        body.to_string()
    }
}

fn action_items(body: &str) -> Vec<String> {
    body.lines()
        .filter(|line| {
            contains_any(&line.to_lowercase(), ACTION_PHRASES)
                || BULLET_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
        })
        .map(|line| line.trim().to_string())
        .take(MAX_ACTION_ITEMS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(subject: &str, body: &str) -> Email {
        let mut email = Email::new("a");
        email.subject = subject.to_string();
        email.body = body.to_string();
        email
    }

    fn analyze_at(email: &Email, level: AnalysisLevel) -> AnalysisResult {
        analyze(email, &AnalysisOptions::with_level(level))
    }

    #[test]
    fn test_plain_email_is_neutral_general() {
        let result = analyze_at(&email("Hi", "See you"), AnalysisLevel::Advanced);

        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.priority, Priority::Medium);
        assert_eq!(result.category, "general");
        assert!(result.auto_labels.is_empty());
        assert!(!result.spam);
    }

    #[test]
    fn test_promotional_spam_threshold() {
        let one = email("Deals", "Click here to see more");
        let three = email("Deals", "Limited time special offer, buy now!");

        let result = analyze_at(&one, AnalysisLevel::Basic);
        assert_eq!(result.auto_labels, vec!["promotional"]);
        assert!(!result.spam);

        assert!(analyze_at(&three, AnalysisLevel::Basic).spam);
    }

    #[test]
    fn test_sentiment() {
        let happy = email("Thanks", "Great work, I appreciate it");
        let sad = email("Problem", "Sorry, there is an issue");

        assert_eq!(
            analyze_at(&happy, AnalysisLevel::Basic).sentiment,
            Sentiment::Positive
        );
        assert_eq!(
            analyze_at(&sad, AnalysisLevel::Basic).sentiment,
            Sentiment::Negative
        );
    }

    #[test]
    fn test_finance_takes_precedence_over_scheduling() {
        let result = analyze_at(
            &email("Invoice", "Let's discuss at the meeting"),
            AnalysisLevel::Basic,
        );

        assert_eq!(result.category, "finance");
        assert_eq!(result.auto_labels, vec!["finance"]);
    }

    #[test]
    fn test_levels_add_signals() {
        let mail = email("Urgent: project update", "Can you reply today?");

        let basic = analyze_at(&mail, AnalysisLevel::Basic);
        assert!(basic.auto_labels.is_empty());
        assert_eq!(basic.priority, Priority::Medium);

        let standard = analyze_at(&mail, AnalysisLevel::Standard);
        assert_eq!(standard.auto_labels, vec!["urgent", "newsletter", "work"]);
        assert_eq!(standard.priority, Priority::High);
        assert!(standard.important);

        let advanced = analyze_at(&mail, AnalysisLevel::Advanced);
        assert_eq!(
            advanced.auto_labels,
            vec!["urgent", "newsletter", "work", "time-sensitive", "request"]
        );
    }

    #[test]
    fn test_shopping_beats_social_sender() {
        let mut mail = email("Your order shipped", "");
        mail.sender_name = "LinkedIn".to_string();
        let result = analyze_at(&mail, AnalysisLevel::Standard);
        assert_eq!(result.category, "shopping");
        assert!(!result.auto_labels.contains(&"social".to_string()));

        let mut mail = email("New connection", "");
        mail.sender_name = "LinkedIn".to_string();
        let result = analyze_at(&mail, AnalysisLevel::Standard);
        assert_eq!(result.category, "social");
        assert_eq!(result.auto_labels, vec!["social"]);
    }

    #[test]
    fn test_keywords_by_frequency_then_first_seen() {
        let result = analyze_at(
            &email("Quarterly budget", "budget review, quarterly planning. Budget!"),
            AnalysisLevel::Basic,
        );

        assert_eq!(
            result.keywords,
            vec!["budget", "quarterly", "review", "planning"]
        );
    }

    #[test]
    fn test_summary_truncates_long_bodies() {
        let body = format!("  {}  ", "x".repeat(150));
        let result = analyze(&email("s", &body), &AnalysisOptions::default());
        assert_eq!(result.summary, format!("{}...", "x".repeat(100)));

        let result = analyze(&email("s", " short "), &AnalysisOptions::default());
        assert_eq!(result.summary, "short");
    }

    #[test]
    fn test_action_items() {
        let body = "Hello,\nPlease review the draft.\n- update slides\nThanks\n* book room\n• send notes";
        let result = analyze(&email("s", body), &AnalysisOptions::default());

        assert_eq!(
            result.action_items,
            vec!["Please review the draft.", "- update slides", "* book room"]
        );
    }

    #[test]
    fn test_options_can_skip_extras() {
        let options = AnalysisOptions {
            level: AnalysisLevel::Basic,
            include_summary: false,
            include_action_items: false,
        };
        let result = analyze(&email("s", "Please do this"), &options);

        assert!(result.summary.is_empty());
        assert!(result.action_items.is_empty());
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let mail = email("Buy now", "Unsubscribe. Click here. Limited time.");
        let first = analyze(&mail, &AnalysisOptions::default());
        for _ in 0..10 {
            assert_eq!(analyze(&mail, &AnalysisOptions::default()), first);
        }
    }
}
