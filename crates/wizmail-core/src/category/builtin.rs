//! Built-in category definitions seeded into a fresh store.

use super::model::{CategoryRule, Condition, ConditionKind};

fn rule(
    id: &str,
    name: &str,
    icon: &str,
    description: &str,
    conditions: &[(ConditionKind, &str)],
) -> CategoryRule {
    CategoryRule {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        conditions: conditions
            .iter()
            .map(|(kind, value)| Condition::contains(*kind, *value))
            .collect(),
    }
}

/// The default categories, in navigation order.
#[must_use]
pub fn builtin_categories() -> Vec<CategoryRule> {
    use ConditionKind::{Sender, Subject};

    vec![
        rule(
            "social",
            "Social",
            "Users2",
            "Emails from social networks",
            &[
                (Sender, "@facebook.com"),
                (Sender, "@twitter.com"),
                (Sender, "@linkedin.com"),
                (Subject, "friend request"),
                (Subject, "connection"),
            ],
        ),
        rule(
            "updates",
            "Updates",
            "AlertCircle",
            "System updates and notifications",
            &[
                (Sender, "noreply@"),
                (Subject, "update"),
                (Subject, "notification"),
            ],
        ),
        rule(
            "forums",
            "Forums",
            "MessagesSquare",
            "Forum notifications and discussions",
            &[
                (Subject, "forum"),
                (Subject, "thread"),
                (Subject, "discussion"),
            ],
        ),
        rule(
            "shopping",
            "Shopping",
            "ShoppingCart",
            "Shopping receipts and promotions",
            &[
                (Sender, "@amazon.com"),
                (Sender, "@ebay.com"),
                (Subject, "order"),
                (Subject, "receipt"),
                (Subject, "shipment"),
            ],
        ),
        rule(
            "promotions",
            "Promotions",
            "Archive",
            "Marketing emails and promotions",
            &[
                (Subject, "discount"),
                (Subject, "offer"),
                (Subject, "sale"),
                (Subject, "promo"),
            ],
        ),
    ]
}
