//! Recency selection with adaptive widening.
//!
//! "today" looks back 36 hours rather than 24 to absorb timezone skew and
//! scraper latency. When that leaves fewer than [`MIN_VIABLE`] articles the
//! window widens to 48 hours. An empty result is replaced by the fallback
//! set, and the output is always capped at [`MAX_BATCH`].

use crate::fallback::fallback_articles;
use crate::models::{CanonicalArticle, TimeRange};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

pub const TODAY_LOOKBACK_HOURS: i64 = 36;
pub const WIDENED_LOOKBACK_HOURS: i64 = 48;
pub const MIN_VIABLE: usize = 10;
pub const MAX_BATCH: usize = 50;

fn since(articles: &[CanonicalArticle], threshold: DateTime<Utc>) -> Vec<CanonicalArticle> {
    articles
        .iter()
        .filter(|a| a.date >= threshold)
        .cloned()
        .collect()
}

/// Apply the requested recency window.
///
/// # Arguments
///
/// * `articles` - Classified, deduplicated, option-filtered articles
/// * `time_range` - Requested window; `None` keeps every article
/// * `now` - Reference instant for the lookback
///
/// # Returns
///
/// At most [`MAX_BATCH`] articles in input order. Never empty: the fallback
/// set replaces an empty selection.
pub fn select_window(
    articles: Vec<CanonicalArticle>,
    time_range: Option<TimeRange>,
    now: DateTime<Utc>,
) -> Vec<CanonicalArticle> {
    let mut selected = match time_range {
        None => articles,
        Some(TimeRange::Today) => {
            let narrow = since(&articles, now - Duration::hours(TODAY_LOOKBACK_HOURS));
            if narrow.len() < MIN_VIABLE {
                info!(
                    count = narrow.len(),
                    "Too few articles in {TODAY_LOOKBACK_HOURS}h; widening to {WIDENED_LOOKBACK_HOURS}h"
                );
                since(&articles, now - Duration::hours(WIDENED_LOOKBACK_HOURS))
            } else {
                narrow
            }
        }
        Some(TimeRange::Week) => since(&articles, now - Duration::days(7)),
        Some(TimeRange::Month) => since(&articles, now - Duration::days(30)),
    };

    if selected.is_empty() {
        info!("No articles left after time filter; using fallback set");
        selected = fallback_articles(now);
    }

    selected.truncate(MAX_BATCH);
    debug!(count = selected.len(), "Time window applied");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aged(now: DateTime<Utc>, title: &str, hours: i64) -> CanonicalArticle {
        let mut a = fallback_articles(now).remove(0);
        a.id = format!("test-{title}");
        a.title = title.to_string();
        a.date = now - Duration::hours(hours);
        a
    }

    #[test]
    fn test_widens_to_48h_when_36h_has_fewer_than_ten() {
        let now = Utc::now();
        let mut articles = vec![aged(now, "old", 40)];
        articles.extend((0..9).map(|i| aged(now, &format!("fresh-{i}"), 10)));

        let out = select_window(articles, Some(TimeRange::Today), now);
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].title, "old");
    }

    #[test]
    fn test_no_widening_when_36h_is_viable() {
        let now = Utc::now();
        let mut articles = vec![aged(now, "old", 40)];
        articles.extend((0..10).map(|i| aged(now, &format!("fresh-{i}"), 10)));

        let out = select_window(articles, Some(TimeRange::Today), now);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|a| a.title != "old"));
    }

    #[test]
    fn test_beyond_48h_is_excluded_even_after_widening() {
        let now = Utc::now();
        let articles = vec![aged(now, "ancient", 60), aged(now, "recent", 1)];
        let out = select_window(articles, Some(TimeRange::Today), now);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "recent");
    }

    #[test]
    fn test_empty_result_falls_back() {
        let now = Utc::now();
        let out = select_window(vec![aged(now, "ancient", 100)], Some(TimeRange::Today), now);
        assert_eq!(out, fallback_articles(now));

        assert_eq!(select_window(Vec::new(), None, now), fallback_articles(now));
        assert!(!select_window(Vec::new(), Some(TimeRange::Month), now).is_empty());
    }

    #[test]
    fn test_week_and_month_windows() {
        let now = Utc::now();
        let articles = vec![
            aged(now, "yesterday", 24),
            aged(now, "ten-days", 240),
            aged(now, "two-months", 24 * 60),
        ];
        let week = select_window(articles.clone(), Some(TimeRange::Week), now);
        assert_eq!(week.len(), 1);
        let month = select_window(articles.clone(), Some(TimeRange::Month), now);
        assert_eq!(month.len(), 2);
        let all = select_window(articles, None, now);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_output_is_capped_preserving_order() {
        let now = Utc::now();
        let articles: Vec<_> = (0..75).map(|i| aged(now, &format!("a-{i}"), 1)).collect();
        let out = select_window(articles, Some(TimeRange::Today), now);
        assert_eq!(out.len(), MAX_BATCH);
        assert_eq!(out[0].title, "a-0");
        assert_eq!(out[MAX_BATCH - 1].title, "a-49");
    }
}
