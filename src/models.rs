//! Data models for articles as they move through the pipeline.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`RawArticle`]: loosely-typed article produced by a source adapter
//! - [`CanonicalArticle`]: classified article handed to callers
//! - Label enums: [`Category`], [`Sentiment`], [`Region`]
//! - Request options: [`NewsOptions`], [`TimeRange`], [`LabelFilter`]
//!
//! Canonical articles serialize with camelCase keys (`imageUrl`) so the JSON
//! matches what the dashboard reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder image used when an article has no usable image reference.
pub const PLACEHOLDER_IMAGE: &str = "/nigerian-tech-startup.jpg";

/// Placeholder link used when an article has no link.
pub const PLACEHOLDER_LINK: &str = "#";

/// Reputation constant assigned to every fetched article.
pub const DEFAULT_CREDIBILITY: f32 = 0.85;

/// An article as produced by a source adapter, before any validation.
///
/// Every field is optional: adapters map whatever their provider returns and
/// leave the rest empty. The quality filter decides what survives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    /// Publication instant, when the provider supplied a parseable one.
    pub published_at: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    /// Kind of adapter that produced the article; prefixes its id.
    pub origin: Origin,
}

/// Adapter kind an article came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Scraped,
    NewsApi,
    Mediastack,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Scraped => "scraped",
            Origin::NewsApi => "newsapi",
            Origin::Mediastack => "mediastack",
        }
    }
}

/// Topical category. Variant order mirrors the classifier cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Business,
    Politics,
    Culture,
    Science,
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Global,
    Africa,
    Nigeria,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Politics => "politics",
            Category::Culture => "culture",
            Category::Science => "science",
            Category::World => "world",
        }
    }
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Global => "global",
            Region::Africa => "africa",
            Region::Nigeria => "nigeria",
        }
    }
}

macro_rules! label_display_from_str {
    ($ty:ident { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!("unknown {}: {other}", stringify!($ty).to_lowercase())),
                }
            }
        }
    };
}

label_display_from_str!(Category {
    "technology" => Technology,
    "business" => Business,
    "politics" => Politics,
    "culture" => Culture,
    "science" => Science,
    "world" => World,
});

label_display_from_str!(Sentiment {
    "positive" => Positive,
    "negative" => Negative,
    "neutral" => Neutral,
});

label_display_from_str!(Region {
    "global" => Global,
    "africa" => Africa,
    "nigeria" => Nigeria,
});

/// A fully classified article.
///
/// Constructed once by the pipeline (or taken from the fallback table) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalArticle {
    /// Unique within one pipeline invocation only.
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub category: Category,
    pub sentiment: Sentiment,
    pub region: Region,
    /// Serialized as an RFC 3339 timestamp.
    pub date: DateTime<Utc>,
    pub image_url: String,
    pub link: String,
    /// Source reputation in `[0, 1]`; not derived from content.
    pub credibility: f32,
}

/// Requested recency window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Today,
    Week,
    Month,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(TimeRange::Today),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            other => Err(format!("unknown time range: {other}")),
        }
    }
}

/// Either `"all"` or one specific label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq + Copy> LabelFilter<T> {
    pub fn matches(&self, label: T) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Only(wanted) => *wanted == label,
        }
    }

    pub fn label(&self) -> Option<T> {
        match self {
            LabelFilter::All => None,
            LabelFilter::Only(l) => Some(*l),
        }
    }
}

impl<T: FromStr<Err = String>> FromStr for LabelFilter<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(LabelFilter::All)
        } else {
            s.parse().map(LabelFilter::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for LabelFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFilter::All => f.write_str("all"),
            LabelFilter::Only(l) => l.fmt(f),
        }
    }
}

/// Options accepted by [`crate::pipeline::NewsService::get_news`].
///
/// `time_range: None` disables recency filtering entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsOptions {
    pub category: LabelFilter<Category>,
    pub region: LabelFilter<Region>,
    pub sentiment: LabelFilter<Sentiment>,
    pub time_range: Option<TimeRange>,
}

impl Default for NewsOptions {
    fn default() -> Self {
        Self {
            category: LabelFilter::All,
            region: LabelFilter::All,
            sentiment: LabelFilter::All,
            time_range: Some(TimeRange::Today),
        }
    }
}
