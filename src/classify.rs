//! Rule-based keyword classifier.
//!
//! Three independent matchers run over `lowercase(title + " " + description)`.
//! All matching is substring containment, not token matching: "ai" matches
//! inside "said". That is the intended behavior of the rule set.
//!
//! - Category: first-match cascade in a fixed priority order.
//! - Sentiment: positive vs negative word counts, ties neutral.
//! - Region: Nigeria terms take precedence over wider Africa terms.

use crate::models::{Category, Region, Sentiment};
use once_cell::sync::Lazy;
use regex::Regex;

/// Cascade order is significant: the first pattern that matches wins.
static CATEGORY_RULES: Lazy<Vec<(Category, Regex)>> = Lazy::new(|| {
    [
        (Category::Technology, r"tech|software|ai|startup|digital|app|crypto|fintech"),
        (Category::Business, r"business|market|trade|economy|finance"),
        (Category::Politics, r"government|politics|election|policy"),
        (Category::Culture, r"culture|film|music|entertainment|fashion"),
        (Category::Science, r"science|research|energy|health"),
    ]
    .into_iter()
    .map(|(category, pattern)| (category, Regex::new(pattern).expect("valid category regex")))
    .collect()
});

pub const POSITIVE_WORDS: &[&str] = &[
    "growth",
    "success",
    "achieve",
    "improve",
    "advance",
    "boost",
    "surge",
    "record",
    "gain",
    "profit",
    "launch",
    "innovation",
    "investment",
    "partnership",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "decline",
    "loss",
    "crisis",
    "drop",
    "fail",
    "worse",
    "concern",
    "risk",
    "threat",
    "attack",
    "bankruptcy",
    "layoff",
    "controversy",
];

pub const NIGERIA_TERMS: &[&str] = &[
    "nigeria",
    "lagos",
    "abuja",
    "kano",
    "port harcourt",
    "tinubu",
    "naira",
    "fg",
    "inec",
];

pub const AFRICA_TERMS: &[&str] = &["africa", "kenya", "ghana", "south africa", "uganda"];

/// The three labels computed for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub category: Category,
    pub sentiment: Sentiment,
    pub region: Region,
}

fn normalized(title: &str, description: &str) -> String {
    format!("{title} {description}").to_lowercase()
}

pub fn classify(title: &str, description: &str) -> Labels {
    let text = normalized(title, description);
    Labels {
        category: category_of(&text),
        sentiment: sentiment_of(&text),
        region: region_of(&text),
    }
}

/// `text` must already be lowercased.
pub fn category_of(text: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(category, _)| *category)
        .unwrap_or(Category::World)
}

/// Each list word counts at most once, however often it appears.
pub fn sentiment_of(text: &str) -> Sentiment {
    let count = |words: &[&str]| words.iter().filter(|w| text.contains(*w)).count();
    let positive = count(POSITIVE_WORDS);
    let negative = count(NEGATIVE_WORDS);

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

pub fn region_of(text: &str) -> Region {
    let contains_any = |terms: &[&str]| terms.iter().any(|t| text.contains(t));
    if contains_any(NIGERIA_TERMS) {
        Region::Nigeria
    } else if contains_any(AFRICA_TERMS) {
        Region::Africa
    } else {
        Region::Global
    }
}
