//! Source adapters: fetch raw articles from one configured source.
//!
//! Every adapter shares one contract: [`fetch_source`] returns whatever the
//! source yielded, and an empty list on any network or parsing failure. The
//! failure is logged here and never propagated.
//!
//! # Adapters
//!
//! | Kind | Module | Method | Notes |
//! |------|--------|--------|-------|
//! | `scrape` | [`scrape`] | HTML scraping | Per-site CSS selectors, capped per source |
//! | `newsapi` | [`newsapi`] | `/v2/everything` | One query per search term; requires key |
//! | `mediastack` | [`mediastack`] | `/v1/news` | Country/category follow the request; requires key |

pub mod api;
pub mod mediastack;
pub mod newsapi;
pub mod scrape;

use crate::config::SourceConfig;
use crate::models::{Category, RawArticle, Region};
use reqwest::Client;
use std::time::Duration;
use tracing::{instrument, warn};

/// Request context some providers use to narrow their query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryHints {
    pub category: Option<Category>,
    pub region: Option<Region>,
}

/// Fetch raw articles from one source. Never fails: errors are logged and
/// mapped to an empty list.
///
/// `query_timeout` bounds each request of multi-request adapters (NewsAPI);
/// single-request adapters are bounded by the caller.
#[instrument(level = "info", skip_all, fields(source = %source.name()))]
pub async fn fetch_source(
    client: &Client,
    source: &SourceConfig,
    per_source_limit: usize,
    hints: &QueryHints,
    query_timeout: Duration,
) -> Vec<RawArticle> {
    match source {
        SourceConfig::Scrape(site) => {
            match scrape::scrape_site(client, site, per_source_limit).await {
                Ok(articles) => articles,
                Err(e) => {
                    warn!(error = %e, "Scrape failed");
                    Vec::new()
                }
            }
        }
        SourceConfig::NewsApi(cfg) => newsapi::fetch_newsapi(client, cfg, query_timeout).await,
        SourceConfig::Mediastack(cfg) => mediastack::fetch_mediastack(client, cfg, hints).await,
    }
}
