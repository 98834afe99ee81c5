//! Concurrent fan-out over every configured source.
//!
//! Each source runs on its own task under its fetch budget (see
//! [`crate::config::SourceConfig::fetch_budget`]). The join waits for
//! every task to settle: an adapter that errors, panics or times out
//! contributes nothing, and its siblings are unaffected. Results are merged
//! in source-table order, which later decides which duplicate survives.

use crate::config::PipelineConfig;
use crate::fallback::fallback_articles;
use crate::models::{CanonicalArticle, RawArticle};
use crate::sources::{QueryHints, fetch_source};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use tracing::{info, instrument, warn};

/// Outcome of the fetch stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// Raw articles from at least one source, in source-table order.
    Raw(Vec<RawArticle>),
    /// Every source came back empty; the pre-classified fallback set.
    Fallback(Vec<CanonicalArticle>),
}

/// Fetch from every source concurrently and merge the results.
///
/// # Arguments
///
/// * `client` - Shared HTTP client, cloned into each task
/// * `config` - Source table, per-source limit and adapter timeout
/// * `hints` - Requested category/region, forwarded to providers that filter
/// * `now` - Fetch instant, used for the fallback set
///
/// # Returns
///
/// [`Fetched::Raw`] in source-table order, or [`Fetched::Fallback`] when no
/// source produced anything.
#[instrument(level = "info", skip_all, fields(sources = config.sources.len()))]
pub async fn fetch_all(
    client: &Client,
    config: &PipelineConfig,
    hints: QueryHints,
    now: DateTime<Utc>,
) -> Fetched {
    let handles = config.sources.iter().cloned().map(|source| {
        let client = client.clone();
        let limit = config.per_source_limit;
        let query_timeout = config.adapter_timeout;
        let budget = source.fetch_budget(config.adapter_timeout);
        tokio::spawn(async move {
            tokio::time::timeout(
                budget,
                fetch_source(&client, &source, limit, &hints, query_timeout),
            )
            .await
        })
    });
    let outcomes = join_all(handles).await;

    let mut merged = Vec::new();
    for (source, outcome) in config.sources.iter().zip(outcomes) {
        match outcome {
            Ok(Ok(articles)) => {
                info!(source = %source.name(), count = articles.len(), "Source settled");
                merged.extend(articles);
            }
            Ok(Err(_elapsed)) => {
                warn!(
                    source = %source.name(),
                    timeout_ms = source.fetch_budget(config.adapter_timeout).as_millis() as u64,
                    "Source timed out"
                );
            }
            Err(e) => {
                warn!(source = %source.name(), error = %e, "Source task failed");
            }
        }
    }

    if merged.is_empty() {
        warn!("All sources returned nothing; using fallback set");
        return Fetched::Fallback(fallback_articles(now));
    }

    info!(count = merged.len(), "Merged raw articles");
    Fetched::Raw(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MediastackSource, NewsApiSource, SourceConfig};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn newsapi(base_url: &str) -> SourceConfig {
        SourceConfig::NewsApi(NewsApiSource {
            base_url: base_url.to_string(),
            api_key: Some("k".to_string()),
            queries: vec!["Nigeria".to_string()],
            page_size: 30,
        })
    }

    fn mediastack(base_url: &str) -> SourceConfig {
        SourceConfig::Mediastack(MediastackSource {
            base_url: base_url.to_string(),
            api_key: Some("k".to_string()),
            limit: 50,
        })
    }

    fn config(sources: Vec<SourceConfig>) -> PipelineConfig {
        PipelineConfig {
            sources,
            adapter_timeout: Duration::from_millis(500),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_no_sources_yields_fallback() {
        let now = Utc::now();
        let fetched = fetch_all(&Client::new(), &config(Vec::new()), QueryHints::default(), now).await;
        assert_eq!(fetched, Fetched::Fallback(fallback_articles(now)));
    }

    #[tokio::test]
    async fn test_failing_and_slow_sources_do_not_affect_siblings() {
        let good = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "articles": [{
                    "source": { "name": "Nairametrics" },
                    "title": "Naira firms against the dollar",
                    "description": "Traders reported steady demand at the official window.",
                    "url": "https://nairametrics.com/a",
                    "publishedAt": "2025-05-06T10:00:00Z"
                }]
            })))
            .mount(&good)
            .await;

        let broken = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&broken)
            .await;

        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [] }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&slow)
            .await;

        let cfg = config(vec![
            mediastack(&broken.uri()),
            mediastack(&slow.uri()),
            newsapi(&good.uri()),
        ]);
        let fetched = fetch_all(&Client::new(), &cfg, QueryHints::default(), Utc::now()).await;

        match fetched {
            Fetched::Raw(articles) => {
                assert_eq!(articles.len(), 1);
                assert_eq!(articles[0].source.as_deref(), Some("Nairametrics"));
            }
            other => panic!("expected raw articles, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_newsapi_query_keeps_results_of_fast_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "fast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "articles": [{
                    "source": { "name": "Premium Times" },
                    "title": "Senate passes revised budget",
                    "description": "Lawmakers approved the bill after a long debate.",
                    "url": "https://premiumtimesng.com/a"
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "ok", "articles": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut source = newsapi(&server.uri());
        if let SourceConfig::NewsApi(s) = &mut source {
            s.queries = vec!["fast".to_string(), "slow".to_string()];
        }
        let fetched = fetch_all(&Client::new(), &config(vec![source]), QueryHints::default(), Utc::now()).await;

        let Fetched::Raw(articles) = fetched else {
            panic!("results of the fast query were discarded");
        };
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source.as_deref(), Some("Premium Times"));
    }

    #[tokio::test]
    async fn test_merge_preserves_source_order() {
        let first = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "title": "From the first source", "source": "First" }]
            })))
            .mount(&first)
            .await;
        let second = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "title": "From the second source", "source": "Second" }]
            })))
            .mount(&second)
            .await;

        let cfg = config(vec![mediastack(&first.uri()), mediastack(&second.uri())]);
        let Fetched::Raw(articles) =
            fetch_all(&Client::new(), &cfg, QueryHints::default(), Utc::now()).await
        else {
            panic!("expected raw articles");
        };
        let sources: Vec<_> = articles.iter().filter_map(|a| a.source.as_deref()).collect();
        assert_eq!(sources, vec!["First", "Second"]);
    }
}
