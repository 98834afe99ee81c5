//! The aggregation pipeline behind [`NewsService::get_news`].
//!
//! ```text
//! sources ─▶ fetch_all ─▶ is_quality ─▶ classify ─▶ dedup ─▶ option filters ─▶ select_window
//!                │                                    ▲
//!                └── Fallback (pre-classified) ───────┘
//! ```
//!
//! Callers always receive a non-empty list. Source failures degrade to empty
//! contributions, and a panic anywhere inside the pipeline is caught at the
//! task boundary and answered with the fallback set.

use crate::classify::classify;
use crate::config::PipelineConfig;
use crate::dedup::dedup_by_title;
use crate::fallback::fallback_articles;
use crate::fetch::{Fetched, fetch_all};
use crate::models::{
    CanonicalArticle, DEFAULT_CREDIBILITY, NewsOptions, PLACEHOLDER_IMAGE, PLACEHOLDER_LINK,
    RawArticle,
};
use crate::quality::is_quality;
use crate::sources::QueryHints;
use crate::window::select_window;
use chrono::{DateTime, Utc};
use rand::{Rng, rng};
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info, instrument};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Entry point for consumers (dashboard export, digest job).
#[derive(Debug, Clone)]
pub struct NewsService {
    client: Client,
    config: Arc<PipelineConfig>,
}

impl NewsService {
    /// Build a service with its own HTTP client honoring
    /// `config.request_timeout`.
    pub fn new(config: PipelineConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: PipelineConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Fetch, classify, filter and window articles.
    ///
    /// # Arguments
    ///
    /// * `options` - Label filters and recency window; `"all"` disables a filter
    ///
    /// # Returns
    ///
    /// At most [`crate::window::MAX_BATCH`] articles in source-table order.
    /// Never empty: the fallback set stands in when nothing survives, and
    /// also when the pipeline task panics.
    #[instrument(level = "info", skip(self), fields(
        category = %options.category,
        region = %options.region,
        sentiment = %options.sentiment,
        time_range = ?options.time_range,
    ))]
    pub async fn get_news(&self, options: NewsOptions) -> Vec<CanonicalArticle> {
        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        let task = tokio::spawn(async move {
            let now = Utc::now();
            let hints = QueryHints {
                category: options.category.label(),
                region: options.region.label(),
            };
            let fetched = fetch_all(&client, &config, hints, now).await;
            process(fetched, &options, now)
        });

        match task.await {
            Ok(articles) => {
                info!(count = articles.len(), "Returning articles");
                articles
            }
            Err(e) => {
                error!(error = %e, "Pipeline task failed; returning fallback set");
                fallback_articles(Utc::now())
            }
        }
    }
}

/// Run every stage after fetching. Pure apart from id generation.
///
/// Fetched raw articles go through [`is_quality`], [`canonicalize`],
/// [`dedup_by_title`], the option filters and [`select_window`]. A
/// [`Fetched::Fallback`] set skips the first two stages.
pub fn process(fetched: Fetched, options: &NewsOptions, now: DateTime<Utc>) -> Vec<CanonicalArticle> {
    let classified = match fetched {
        Fetched::Fallback(articles) => articles,
        Fetched::Raw(raw) => {
            let total = raw.len();
            let kept: Vec<_> = raw
                .into_iter()
                .filter(is_quality)
                .filter_map(|article| canonicalize(article, now))
                .collect();
            info!(total, kept = kept.len(), "Quality filter applied");
            kept
        }
    };

    let unique = dedup_by_title(classified);
    let matching: Vec<_> = unique
        .into_iter()
        .filter(|a| {
            options.category.matches(a.category)
                && options.region.matches(a.region)
                && options.sentiment.matches(a.sentiment)
        })
        .collect();

    select_window(matching, options.time_range, now)
}

/// Map a quality-checked raw article to its canonical form.
///
/// # Arguments
///
/// * `raw` - An article that passed [`is_quality`]
/// * `now` - Fetch instant, used when the article carries no date
///
/// # Returns
///
/// The classified article with id `{origin}-{9 base36 chars}`, or `None`
/// when the title or description is missing.
pub fn canonicalize(raw: RawArticle, now: DateTime<Utc>) -> Option<CanonicalArticle> {
    let RawArticle {
        title: Some(title),
        description: Some(description),
        source,
        published_at,
        link,
        image_url,
        origin,
    } = raw
    else {
        return None;
    };

    let labels = classify(&title, &description);
    Some(CanonicalArticle {
        id: format!("{}-{}", origin.as_str(), random_suffix(9)),
        title,
        description,
        source: source.unwrap_or_else(|| "Unknown".to_string()),
        category: labels.category,
        sentiment: labels.sentiment,
        region: labels.region,
        date: published_at.unwrap_or(now),
        image_url: image_url
            .filter(|u| u.starts_with("http") || u.starts_with('/'))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        link: link.unwrap_or_else(|| PLACEHOLDER_LINK.to_string()),
        credibility: DEFAULT_CREDIBILITY,
    })
}

fn random_suffix(len: usize) -> String {
    let mut rng = rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
