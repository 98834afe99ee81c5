//! Source configuration table.
//!
//! Every source is described by data rather than by its own type: scraped
//! sites carry a base URL and CSS selectors, API providers carry their
//! endpoint, key and query parameters. One generic scraping function and one
//! generic JSON query function are driven from this table (see
//! [`crate::sources`]).
//!
//! The built-in table can be replaced with a YAML file:
//!
//! ```yaml
//! sources:
//!   - kind: scrape
//!     name: Daily Trust
//!     url: https://www.dailytrust.com.ng
//!     selectors:
//!       article: article.post-item
//!       title: h3 a, h2 a
//!       description: .post-excerpt, p
//!       link: a
//!       date: .post-date, time
//!       image: img
//!   - kind: newsapi
//!     queries: ["Nigerian fintech"]
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

pub const NEWSAPI_URL: &str = "https://newsapi.org/v2";
pub const MEDIASTACK_URL: &str = "https://api.mediastack.com/v1/news";

/// Maximum number of articles a scraping adapter keeps per site.
pub const DEFAULT_PER_SOURCE_LIMIT: usize = 30;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// CSS selectors for one scraped site. All but `article` are resolved
/// relative to the matched article container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectors {
    pub article: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub date: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeSource {
    pub name: String,
    pub url: String,
    pub selectors: Selectors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsApiSource {
    #[serde(default = "default_newsapi_url")]
    pub base_url: String,
    /// Filled from the CLI / environment when absent from the file.
    #[serde(default)]
    pub api_key: Option<String>,
    pub queries: Vec<String>,
    #[serde(default = "default_newsapi_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediastackSource {
    #[serde(default = "default_mediastack_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_mediastack_limit")]
    pub limit: u32,
}

/// One configured source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Scrape(ScrapeSource),
    NewsApi(NewsApiSource),
    Mediastack(MediastackSource),
}

impl SourceConfig {
    pub fn name(&self) -> &str {
        match self {
            SourceConfig::Scrape(s) => &s.name,
            SourceConfig::NewsApi(_) => "NewsAPI",
            SourceConfig::Mediastack(_) => "Mediastack",
        }
    }

    /// Time allowed for this source's whole fetch.
    ///
    /// Single-request adapters get `adapter_timeout`. NewsAPI bounds each
    /// query by `adapter_timeout` itself, so its budget covers every query
    /// plus one spare slot and never cuts off results already collected.
    pub fn fetch_budget(&self, adapter_timeout: Duration) -> Duration {
        match self {
            SourceConfig::NewsApi(s) => {
                let slots = u32::try_from(s.queries.len()).unwrap_or(u32::MAX).saturating_add(1);
                adapter_timeout.saturating_mul(slots)
            }
            _ => adapter_timeout,
        }
    }
}

/// Runtime settings shared by every adapter.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sources: Vec<SourceConfig>,
    pub per_source_limit: usize,
    /// Upper bound on a single adapter's whole fetch.
    pub adapter_timeout: Duration,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            per_source_limit: DEFAULT_PER_SOURCE_LIMIT,
            adapter_timeout: Duration::from_secs(20),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl PipelineConfig {
    /// Fill in API keys for providers that did not set one in their table
    /// entry. Providers left without a key are skipped at fetch time.
    pub fn with_api_keys(mut self, newsapi: Option<&str>, mediastack: Option<&str>) -> Self {
        for source in &mut self.sources {
            match source {
                SourceConfig::NewsApi(s) if s.api_key.is_none() => {
                    s.api_key = newsapi.map(str::to_string);
                }
                SourceConfig::Mediastack(s) if s.api_key.is_none() => {
                    s.api_key = mediastack.map(str::to_string);
                }
                _ => {}
            }
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    sources: Vec<SourceConfig>,
}

/// Load a source table from a YAML file.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn load_sources(path: &str) -> Result<Vec<SourceConfig>, Box<dyn Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    let parsed = parse_sources(&text)?;
    info!(count = parsed.len(), "Loaded source table");
    Ok(parsed)
}

pub fn parse_sources(yaml: &str) -> Result<Vec<SourceConfig>, serde_yaml::Error> {
    serde_yaml::from_str::<SourcesFile>(yaml).map(|f| f.sources)
}

fn default_newsapi_url() -> String {
    NEWSAPI_URL.to_string()
}

fn default_newsapi_page_size() -> u32 {
    30
}

fn default_mediastack_url() -> String {
    MEDIASTACK_URL.to_string()
}

fn default_mediastack_limit() -> u32 {
    50
}

fn scrape(name: &str, url: &str, sel: [&str; 6]) -> SourceConfig {
    let [article, title, description, link, date, image] = sel;
    SourceConfig::Scrape(ScrapeSource {
        name: name.to_string(),
        url: url.to_string(),
        selectors: Selectors {
            article: article.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            link: link.to_string(),
            date: date.to_string(),
            image: Some(image.to_string()),
        },
    })
}

/// The built-in source table: six Nigerian sites plus two news APIs.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        scrape(
            "Daily Trust",
            "https://www.dailytrust.com.ng",
            ["article.post-item", "h3 a, h2 a", ".post-excerpt, p", "a", ".post-date, time", "img"],
        ),
        scrape(
            "Punch Nigeria",
            "https://punchng.com",
            ["article, .post", "h2 a, h3 a", ".excerpt, p", "a", ".date, time", "img"],
        ),
        scrape(
            "ThisDay",
            "https://www.thisdaylive.com",
            ["article, .story-item", "h2, h3", ".story-text, p", "a", ".story-date, time", "img"],
        ),
        scrape(
            "TechCabal",
            "https://techcabal.com",
            [
                "article, .article-card",
                "h2 a, h1 a",
                ".article-excerpt, p",
                "a",
                ".publish-date, time",
                ".article-image img, img",
            ],
        ),
        scrape(
            "The Cable",
            "https://www.thecable.ng",
            [
                "article, .story",
                "h2 a, h3 a",
                ".story-summary, p",
                "a",
                ".story-time, time",
                ".story-image img, img",
            ],
        ),
        scrape(
            "Vanguard Nigeria",
            "https://www.vanguardngr.com",
            ["article, .story-item", "h2 a, h3 a", ".story-text, p", "a", ".time, time", "img"],
        ),
        SourceConfig::NewsApi(NewsApiSource {
            base_url: default_newsapi_url(),
            api_key: None,
            queries: vec![
                "Nigeria tech startup".to_string(),
                "Lagos innovation hub".to_string(),
                "Nigerian fintech".to_string(),
                "Africa software development".to_string(),
                "Nigeria AI artificial intelligence".to_string(),
            ],
            page_size: default_newsapi_page_size(),
        }),
        SourceConfig::Mediastack(MediastackSource {
            base_url: default_mediastack_url(),
            api_key: None,
            limit: default_mediastack_limit(),
        }),
    ]
}
