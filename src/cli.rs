//! Command-line interface definitions.
//!
//! Every flag can also come from the environment, so the same binary runs
//! from a shell or a scheduler without a wrapper script.
//!
//! ```sh
//! # Today's Nigerian technology stories, printed as JSON
//! onyeakuko news --region nigeria --category technology
//!
//! # Write this week's batch to ./json/{date}/week.json
//! onyeakuko news --time-range week -j ./json
//!
//! # Send whichever digest is scheduled for the current UTC hour
//! onyeakuko digest --subscribers subscribers.yaml
//! ```

use crate::digest::DigestTime;
use crate::models::{Category, LabelFilter, NewsOptions, Region, Sentiment, TimeRange};
use clap::{Args, Parser, Subcommand};
use std::fmt;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a sources YAML file replacing the built-in table
    #[arg(short, long, env = "ONYEAKUKO_SOURCES", global = true)]
    pub sources: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", global = true, hide_env_values = true)]
    pub newsapi_key: Option<String>,

    /// Mediastack access key
    #[arg(long, env = "MEDIASTACK_API_KEY", global = true, hide_env_values = true)]
    pub mediastack_key: Option<String>,

    /// Maximum articles kept from each scraped site
    #[arg(long, env = "ONYEAKUKO_PER_SOURCE_LIMIT", default_value_t = 30, global = true)]
    pub per_source_limit: usize,

    /// Upper bound in seconds on one source's whole fetch
    #[arg(long, env = "ONYEAKUKO_ADAPTER_TIMEOUT", default_value_t = 20, global = true)]
    pub adapter_timeout_secs: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "ONYEAKUKO_REQUEST_TIMEOUT", default_value_t = 15, global = true)]
    pub request_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, classify and filter articles
    News(NewsArgs),
    /// Email the Morning or Evening digest to subscribers
    Digest(DigestArgs),
}

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// technology, business, politics, culture, science, world or all
    #[arg(long, default_value = "all")]
    pub category: LabelFilter<Category>,

    /// nigeria, africa, global or all
    #[arg(long, default_value = "all")]
    pub region: LabelFilter<Region>,

    /// positive, negative, neutral or all
    #[arg(long, default_value = "all")]
    pub sentiment: LabelFilter<Sentiment>,

    /// today, week, month or all
    #[arg(long, default_value = "today")]
    pub time_range: Window,

    /// Write to `{dir}/{date}/{range}.json` instead of stdout
    #[arg(short, long, env = "ONYEAKUKO_JSON_OUTPUT_DIR")]
    pub json_output_dir: Option<String>,
}

impl NewsArgs {
    pub fn options(&self) -> NewsOptions {
        NewsOptions {
            category: self.category,
            region: self.region,
            sentiment: self.sentiment,
            time_range: self.time_range.0,
        }
    }
}

#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Send this edition regardless of the current hour
    #[arg(long)]
    pub force: Option<DigestTime>,

    /// YAML file of subscribers
    #[arg(long, env = "ONYEAKUKO_SUBSCRIBERS")]
    pub subscribers: String,

    /// Mailtrap API token
    #[arg(long, env = "MAILTRAP_API_KEY", hide_env_values = true)]
    pub mailtrap_api_key: Option<String>,

    /// Mailtrap inbox id
    #[arg(long, env = "MAILTRAP_INBOX_ID")]
    pub mailtrap_inbox_id: Option<String>,
}

/// A time range where `all` disables recency filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window(pub Option<TimeRange>);

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Window(None))
        } else {
            s.parse().map(|r| Window(Some(r)))
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(r) => r.fmt(f),
            None => f.write_str("all"),
        }
    }
}
