//! NewsAPI `everything` search adapter.
//!
//! One request per configured search term. Queries run one after another,
//! each under its own timeout; a failed, slow or non-2xx query is logged and
//! contributes nothing, and the rest still run.

use super::api::{get_json, non_empty};
use crate::config::NewsApiSource;
use crate::error::SourceError;
use crate::models::{Origin, RawArticle};
use crate::sources::scrape::parse_published;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiSourceRef>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    name: Option<String>,
}

/// Title NewsAPI substitutes for articles pulled by the publisher.
const REMOVED_MARKER: &str = "[Removed]";

fn to_raw(article: NewsApiArticle) -> RawArticle {
    RawArticle {
        title: non_empty(article.title).filter(|t| t != REMOVED_MARKER),
        description: non_empty(article.description).or_else(|| non_empty(article.content)),
        source: article.source.and_then(|s| non_empty(s.name)),
        published_at: article.published_at.as_deref().and_then(parse_published),
        link: non_empty(article.url),
        image_url: non_empty(article.url_to_image),
        origin: Origin::NewsApi,
    }
}

async fn fetch_query(
    client: &Client,
    config: &NewsApiSource,
    api_key: &str,
    query: &str,
) -> Result<Vec<RawArticle>, SourceError> {
    let url = format!("{}/everything", config.base_url.trim_end_matches('/'));
    let params = [
        ("q", query.to_string()),
        ("language", "en".to_string()),
        ("sortBy", "publishedAt".to_string()),
        ("pageSize", config.page_size.to_string()),
        ("apiKey", api_key.to_string()),
    ];
    let response: EverythingResponse = get_json(client, &url, &params, "NewsAPI").await?;
    if response.status != "ok" {
        return Err(SourceError::Provider(
            response.message.unwrap_or_else(|| response.status.clone()),
        ));
    }
    Ok(response.articles.into_iter().map(to_raw).collect())
}

/// Run every configured query and concatenate the results.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `config` - Endpoint, key, queries and page size
/// * `query_timeout` - Upper bound on each individual query
///
/// # Returns
///
/// Articles from every query that succeeded in time, in query order. Empty
/// when no API key is configured.
#[instrument(level = "info", skip_all, fields(queries = config.queries.len()))]
pub async fn fetch_newsapi(
    client: &Client,
    config: &NewsApiSource,
    query_timeout: Duration,
) -> Vec<RawArticle> {
    let Some(api_key) = config.api_key.as_deref() else {
        info!("NEWSAPI_KEY not set; skipping NewsAPI");
        return Vec::new();
    };

    let mut articles = Vec::new();
    for query in &config.queries {
        match tokio::time::timeout(query_timeout, fetch_query(client, config, api_key, query)).await {
            Ok(Ok(batch)) => {
                info!(%query, count = batch.len(), "NewsAPI query succeeded");
                articles.extend(batch);
            }
            Ok(Err(e)) => {
                warn!(%query, error = %e, "NewsAPI query failed");
            }
            Err(_elapsed) => {
                warn!(%query, timeout_ms = query_timeout.as_millis() as u64, "NewsAPI query timed out");
            }
        }
    }
    articles
}
