//! # OnyeAkuko
//!
//! News aggregation for Nigerian and African readers. Articles are scraped
//! from news sites and pulled from news APIs concurrently, filtered for
//! quality, labelled by rule-based classifiers, deduplicated and windowed by
//! recency. A digest job mails the top stories to subscribers twice a day.
//!
//! ## Architecture
//!
//! 1. **Fetching** ([`fetch`], [`sources`]): every configured source runs on
//!    its own task; failures and timeouts contribute nothing
//! 2. **Processing** ([`quality`], [`classify`], [`dedup`]): reject thin or
//!    user-generated items, label the rest, drop repeated titles
//! 3. **Selection** ([`window`]): apply the requested filters and recency
//!    window, widening "today" when it is sparse
//! 4. **Delivery** ([`outputs`], [`digest`]): JSON files or email
//!
//! [`NewsService::get_news`] never fails and never returns an empty list; the
//! [`fallback`] set fills in whenever nothing survives.

pub mod classify;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod digest;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod quality;
pub mod sources;
pub mod utils;
pub mod window;

pub use config::PipelineConfig;
pub use error::{DigestError, SourceError};
pub use models::{
    CanonicalArticle, Category, LabelFilter, NewsOptions, RawArticle, Region, Sentiment, TimeRange,
};
pub use pipeline::NewsService;
