//! Generic HTML scraper driven by a [`ScrapeSource`] entry.
//!
//! A site's listing page is fetched once and every element matching the
//! `article` selector becomes a candidate. Field selectors are resolved
//! relative to that container; the first match wins.
//!
//! Candidates without a title or link are skipped, as are titles of ten
//! characters or fewer (section headers, "Read more" links and similar
//! noise). Relative and protocol-relative URLs are made absolute against the
//! site URL.

use crate::config::{BROWSER_USER_AGENT, ScrapeSource};
use crate::error::SourceError;
use crate::models::{Origin, RawArticle};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

const MIN_TITLE_CHARS: usize = 11;

/// Fetch and parse one site's listing page.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `site` - Listing URL and CSS selectors
/// * `limit` - Maximum number of articles kept
///
/// # Errors
///
/// Returns a [`SourceError`] when the URL or a selector is invalid, the
/// request fails, or the site answers with a non-success status.
#[instrument(level = "info", skip_all, fields(source = %site.name))]
pub async fn scrape_site(
    client: &Client,
    site: &ScrapeSource,
    limit: usize,
) -> Result<Vec<RawArticle>, SourceError> {
    let base = Url::parse(&site.url)?;

    let response = client
        .get(base.as_str())
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(SourceError::Status {
            source_name: site.name.clone(),
            status: response.status().as_u16(),
        });
    }
    let html = response.text().await?;

    // Parsed synchronously: `Html` must not live across an await point.
    let articles = parse_listing(&html, site, &base, limit, Utc::now())?;
    info!(count = articles.len(), "Scraped articles");
    Ok(articles)
}

struct CompiledSelectors {
    article: Selector,
    title: Selector,
    description: Selector,
    link: Selector,
    date: Selector,
    image: Option<Selector>,
}

fn compile(selector: &str) -> Result<Selector, SourceError> {
    Selector::parse(selector).map_err(|e| SourceError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl CompiledSelectors {
    fn new(site: &ScrapeSource) -> Result<Self, SourceError> {
        let s = &site.selectors;
        Ok(Self {
            article: compile(&s.article)?,
            title: compile(&s.title)?,
            description: compile(&s.description)?,
            link: compile(&s.link)?,
            date: compile(&s.date)?,
            image: s.image.as_deref().map(compile).transpose()?,
        })
    }
}

/// Extract raw articles from a listing page.
///
/// `now` is the fetch instant, substituted for missing or unparseable dates.
pub fn parse_listing(
    html: &str,
    site: &ScrapeSource,
    base: &Url,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<Vec<RawArticle>, SourceError> {
    let selectors = CompiledSelectors::new(site)?;
    let document = Html::parse_document(html);

    let articles = document
        .select(&selectors.article)
        .filter_map(|container| extract_article(container, &selectors, site, base, now))
        .take(limit)
        .collect();
    Ok(articles)
}

fn extract_article(
    container: ElementRef<'_>,
    selectors: &CompiledSelectors,
    site: &ScrapeSource,
    base: &Url,
    now: DateTime<Utc>,
) -> Option<RawArticle> {
    let title = container
        .select(&selectors.title)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())?;
    let href = container
        .select(&selectors.link)
        .next()
        .and_then(|el| el.value().attr("href"))
        .filter(|h| !h.trim().is_empty())?;

    if title.chars().count() < MIN_TITLE_CHARS {
        debug!(%title, "Skipping short title");
        return None;
    }

    let link = resolve_url(href, base)?;

    let description = container
        .select(&selectors.description)
        .next()
        .map(element_text)
        .filter(|d| !d.is_empty());

    let published_at = container
        .select(&selectors.date)
        .next()
        .and_then(|el| {
            el.value()
                .attr("datetime")
                .and_then(parse_published)
                .or_else(|| parse_published(&element_text(el)))
        })
        .unwrap_or(now);

    let image_url = selectors.image.as_ref().and_then(|sel| {
        let img = container.select(sel).next()?;
        let src = img
            .value()
            .attr("src")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| img.value().attr("data-src"))?;
        resolve_url(src, base)
    });

    Some(RawArticle {
        title: Some(title),
        description,
        source: Some(site.name.clone()),
        published_at: Some(published_at),
        link: Some(link),
        image_url,
        origin: Origin::Scraped,
    })
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Make `raw` absolute: protocol-relative URLs get `https:`, relative ones
/// are joined onto `base`.
pub fn resolve_url(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Url::parse(&format!("https://{rest}")).ok().map(String::from);
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Url::parse(raw).ok().map(String::from);
    }
    base.join(raw).ok().map(String::from)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%b %d, %Y %I:%M %p",
    "%d %B %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d/%m/%Y",
];

/// Best-effort parse of a free-text publication date. Naive values are
/// taken as UTC; date-only values as midnight UTC.
pub fn parse_published(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Mediastack style: 2025-05-06T14:30:00+0000
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Selectors;
    use chrono::TimeZone;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn site(url: &str) -> ScrapeSource {
        ScrapeSource {
            name: "Punch Nigeria".to_string(),
            url: url.to_string(),
            selectors: Selectors {
                article: "article, .post".to_string(),
                title: "h2 a, h3 a".to_string(),
                description: ".excerpt, p".to_string(),
                link: "a".to_string(),
                date: ".date, time".to_string(),
                image: Some("img".to_string()),
            },
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 7, 12, 0, 0).unwrap()
    }

    const LISTING: &str = r#"
<html><body>
  <article>
    <h2><a href="/news/lagos-fintech">Lagos fintech startup closes funding round</a></h2>
    <p class="excerpt">The company says it will expand across West Africa next year.</p>
    <time datetime="2025-05-06T09:15:00Z">Yesterday</time>
    <img src="//cdn.punchng.com/lagos.jpg">
  </article>
  <article>
    <h2><a href="https://punchng.com/abuja-budget">Abuja unveils new budget</a></h2>
    <span class="date">May 16, 2025</span>
    <img data-src="/images/budget.png" src="">
  </article>
  <article>
    <h2><a href="/short">Too short</a></h2>
    <p>Short titles are dropped by the scraper.</p>
  </article>
  <article>
    <h2>Headline without any link at all</h2>
  </article>
  <div class="post">
    <h3><a href="/kano-market">Kano traders react to market reforms</a></h3>
    <span class="date">sometime last week</span>
  </div>
</body></html>
"#;

    #[test]
    fn test_parse_listing_extracts_and_filters_candidates() {
        let s = site("https://punchng.com");
        let base = Url::parse(&s.url).unwrap();
        let articles = parse_listing(LISTING, &s, &base, 30, now()).unwrap();

        assert_eq!(articles.len(), 3);

        let first = &articles[0];
        assert_eq!(
            first.title.as_deref(),
            Some("Lagos fintech startup closes funding round")
        );
        assert_eq!(
            first.link.as_deref(),
            Some("https://punchng.com/news/lagos-fintech")
        );
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://cdn.punchng.com/lagos.jpg")
        );
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 9, 15, 0).unwrap())
        );
        assert_eq!(first.source.as_deref(), Some("Punch Nigeria"));

        let second = &articles[1];
        assert_eq!(second.description, None);
        assert_eq!(
            second.image_url.as_deref(),
            Some("https://punchng.com/images/budget.png")
        );
        assert_eq!(
            second.published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 16, 0, 0, 0).unwrap())
        );

        let third = &articles[2];
        assert_eq!(third.published_at, Some(now()));
        assert_eq!(third.image_url, None);
    }

    #[test]
    fn test_parse_listing_respects_limit() {
        let s = site("https://punchng.com");
        let base = Url::parse(&s.url).unwrap();
        let articles = parse_listing(LISTING, &s, &base, 1, now()).unwrap();
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_parse_listing_rejects_invalid_selector() {
        let mut s = site("https://punchng.com");
        s.selectors.article = "article[".to_string();
        let base = Url::parse(&s.url).unwrap();
        let err = parse_listing(LISTING, &s, &base, 30, now()).unwrap_err();
        assert!(matches!(err, SourceError::Selector { .. }));
    }

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.thecable.ng").unwrap();
        assert_eq!(
            resolve_url("/politics/x", &base).as_deref(),
            Some("https://www.thecable.ng/politics/x")
        );
        assert_eq!(
            resolve_url("//img.thecable.ng/a.jpg", &base).as_deref(),
            Some("https://img.thecable.ng/a.jpg")
        );
        assert_eq!(
            resolve_url("http://other.com/a", &base).as_deref(),
            Some("http://other.com/a")
        );
        assert_eq!(resolve_url("   ", &base), None);
    }

    #[test]
    fn test_parse_published_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 16, 0, 0, 0).unwrap();
        assert_eq!(parse_published("2025-05-16"), Some(expected));
        assert_eq!(parse_published("May 16, 2025"), Some(expected));
        assert_eq!(parse_published("16 May 2025"), Some(expected));
        assert_eq!(
            parse_published("Fri, 16 May 2025 10:00:00 +0100"),
            Some(Utc.with_ymd_and_hms(2025, 5, 16, 9, 0, 0).unwrap())
        );
        assert_eq!(
            parse_published("2025-05-16T10:00:00+0000"),
            Some(Utc.with_ymd_and_hms(2025, 5, 16, 10, 0, 0).unwrap())
        );
        assert_eq!(parse_published("2 hours ago"), None);
        assert_eq!(parse_published(""), None);
    }

    #[tokio::test]
    async fn test_scrape_site_fetches_with_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;

        let s = site(&server.uri());
        let articles = scrape_site(&Client::new(), &s, 30).await.unwrap();
        assert_eq!(articles.len(), 3);
        assert!(
            articles[0]
                .link
                .as_deref()
                .unwrap()
                .starts_with(&server.uri())
        );
    }

    #[tokio::test]
    async fn test_scrape_site_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = scrape_site(&Client::new(), &site(&server.uri()), 30)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 503, .. }));
    }
}
