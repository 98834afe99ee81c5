//! Fixed, pre-classified articles returned when nothing usable was fetched.
//!
//! The table is process-wide immutable data. Only `date` depends on the
//! moment the set is requested: each entry sits a fixed offset before `now`,
//! so the set always passes the narrowest recency window.

use crate::models::{CanonicalArticle, Category, Region, Sentiment};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

struct FallbackEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    source: &'static str,
    category: Category,
    sentiment: Sentiment,
    region: Region,
    age_minutes: i64,
    image_url: &'static str,
    link: &'static str,
    credibility: f32,
}

static FALLBACK: Lazy<Vec<FallbackEntry>> = Lazy::new(|| {
    vec![
        FallbackEntry {
            id: "fallback-1",
            title: "Nigeria's Tech Startups Raise $500M in 2024",
            description: "Nigerian tech entrepreneurs continue to attract global investment, with Lagos emerging as Africa's leading tech hub. The surge in funding reflects growing confidence in Nigerian innovation.",
            source: "TechCabal",
            category: Category::Technology,
            sentiment: Sentiment::Positive,
            region: Region::Nigeria,
            age_minutes: 0,
            image_url: "/nigerian-tech-startup.jpg",
            link: "https://techcabal.com",
            credibility: 0.9,
        },
        FallbackEntry {
            id: "fallback-2",
            title: "Lagos Launches New Fintech Regulation Framework",
            description: "The Central Bank of Nigeria introduces comprehensive fintech guidelines to support financial innovation while maintaining regulatory oversight in Africa's largest financial market.",
            source: "Punch Nigeria",
            category: Category::Business,
            sentiment: Sentiment::Positive,
            region: Region::Nigeria,
            age_minutes: 60,
            image_url: "/nigerian-fintech.jpg",
            link: "https://punchng.com",
            credibility: 0.88,
        },
        FallbackEntry {
            id: "fallback-3",
            title: "African Tech Leaders Gather for Innovation Summit",
            description: "Leading tech entrepreneurs from across Africa convene to discuss digital transformation, startup ecosystem development, and opportunities in emerging technologies.",
            source: "Daily Trust",
            category: Category::Technology,
            sentiment: Sentiment::Neutral,
            region: Region::Africa,
            age_minutes: 120,
            image_url: "/african-tech-summit.jpg",
            link: "https://dailytrust.com.ng",
            credibility: 0.87,
        },
    ]
});

/// Materialize the fallback set relative to `now`.
pub fn fallback_articles(now: DateTime<Utc>) -> Vec<CanonicalArticle> {
    FALLBACK
        .iter()
        .map(|e| CanonicalArticle {
            id: e.id.to_string(),
            title: e.title.to_string(),
            description: e.description.to_string(),
            source: e.source.to_string(),
            category: e.category,
            sentiment: e.sentiment,
            region: e.region,
            date: now - Duration::minutes(e.age_minutes),
            image_url: e.image_url.to_string(),
            link: e.link.to_string(),
            credibility: e.credibility,
        })
        .collect()
}
