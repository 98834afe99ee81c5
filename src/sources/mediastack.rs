//! Mediastack `news` adapter.
//!
//! A single request whose `countries` and `categories` parameters follow the
//! caller's requested region and category.

use super::QueryHints;
use super::api::{get_json, non_empty};
use crate::config::MediastackSource;
use crate::error::SourceError;
use crate::models::{Origin, RawArticle, Region};
use crate::sources::scrape::parse_published;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Vec<MediastackArticle>,
}

#[derive(Debug, Deserialize)]
struct MediastackArticle {
    title: Option<String>,
    description: Option<String>,
    source: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
}

fn to_raw(article: MediastackArticle) -> RawArticle {
    RawArticle {
        title: non_empty(article.title),
        description: non_empty(article.description),
        source: non_empty(article.source),
        published_at: article.published_at.as_deref().and_then(parse_published),
        link: non_empty(article.url),
        image_url: non_empty(article.image),
        origin: Origin::Mediastack,
    }
}

/// Country codes sent for a requested region.
pub fn countries_for(region: Option<Region>) -> Option<&'static str> {
    match region {
        Some(Region::Nigeria) => Some("ng"),
        Some(Region::Africa) => Some("ng,za,ke,gh"),
        Some(Region::Global) | None => None,
    }
}

fn build_params(config: &MediastackSource, api_key: &str, hints: &QueryHints) -> Vec<(&'static str, String)> {
    let mut params = vec![("access_key", api_key.to_string())];
    if let Some(countries) = countries_for(hints.region) {
        params.push(("countries", countries.to_string()));
    }
    if let Some(category) = hints.category {
        params.push(("categories", category.to_string()));
    }
    params.push(("languages", "en".to_string()));
    params.push(("limit", config.limit.to_string()));
    params.push(("sort", "published_desc".to_string()));
    params
}

async fn fetch(
    client: &Client,
    config: &MediastackSource,
    api_key: &str,
    hints: &QueryHints,
) -> Result<Vec<RawArticle>, SourceError> {
    let params = build_params(config, api_key, hints);
    let response: NewsResponse = get_json(client, &config.base_url, &params, "Mediastack").await?;
    Ok(response.data.into_iter().map(to_raw).collect())
}

#[instrument(level = "info", skip_all)]
pub async fn fetch_mediastack(
    client: &Client,
    config: &MediastackSource,
    hints: &QueryHints,
) -> Vec<RawArticle> {
    let Some(api_key) = config.api_key.as_deref() else {
        info!("MEDIASTACK_API_KEY not set; skipping Mediastack");
        return Vec::new();
    };

    match fetch(client, config, api_key, hints).await {
        Ok(articles) => {
            info!(count = articles.len(), "Mediastack fetch succeeded");
            articles
        }
        Err(e) => {
            warn!(error = %e, "Mediastack fetch failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> MediastackSource {
        MediastackSource {
            base_url: base_url.to_string(),
            api_key: Some("ms-key".to_string()),
            limit: 50,
        }
    }

    #[test]
    fn test_countries_for_region() {
        assert_eq!(countries_for(Some(Region::Nigeria)), Some("ng"));
        assert_eq!(countries_for(Some(Region::Africa)), Some("ng,za,ke,gh"));
        assert_eq!(countries_for(Some(Region::Global)), None);
        assert_eq!(countries_for(None), None);
    }

    #[test]
    fn test_build_params_omits_unset_filters() {
        let params = build_params(&config("http://x"), "k", &QueryHints::default());
        let keys: Vec<_> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["access_key", "languages", "limit", "sort"]);
    }

    #[tokio::test]
    async fn test_fetch_mediastack_sends_hints_and_maps_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("access_key", "ms-key"))
            .and(query_param("countries", "ng"))
            .and(query_param("categories", "business"))
            .and(query_param("sort", "published_desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pagination": { "limit": 50, "offset": 0, "count": 1, "total": 1 },
                "data": [{
                    "author": null,
                    "title": "Naira steadies as CBN intervenes",
                    "description": "The currency held its ground in the official window on Tuesday.",
                    "url": "https://guardian.ng/naira",
                    "source": "Guardian Nigeria",
                    "image": null,
                    "category": "business",
                    "language": "en",
                    "country": "ng",
                    "published_at": "2025-05-06T08:00:00+00:00"
                }]
            })))
            .mount(&server)
            .await;

        let hints = QueryHints {
            category: Some(Category::Business),
            region: Some(Region::Nigeria),
        };
        let articles = fetch_mediastack(&Client::new(), &config(&server.uri()), &hints).await;

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source.as_deref(), Some("Guardian Nigeria"));
        assert_eq!(articles[0].image_url, None);
        assert!(articles[0].published_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_mediastack_failure_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let articles =
            fetch_mediastack(&Client::new(), &config(&server.uri()), &QueryHints::default()).await;
        assert!(articles.is_empty());
    }
}
