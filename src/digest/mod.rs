//! Scheduled email digests.
//!
//! A digest run resolves which edition to send (Morning at 09:00 UTC,
//! Evening at 19:00 UTC, or an explicit override), fetches the current
//! article batch through [`NewsService`], renders the top
//! [`DIGEST_SIZE`] stories and mails them to every matching subscriber.
//!
//! # Submodules
//!
//! - [`subscribers`]: [`SubscriberStore`] boundary and an in-memory store
//! - [`email`]: [`EmailSender`] boundary and the Mailtrap HTTP sender
//! - [`template`]: HTML rendering

pub mod email;
pub mod subscribers;
pub mod template;

pub use email::{EmailSender, MailtrapConfig, MailtrapSender};
pub use subscribers::{
    DigestPreferences, InMemorySubscriberStore, SubscribeOutcome, SubscriberStore, Subscription,
};
pub use template::render_digest_html;

use crate::models::{CanonicalArticle, NewsOptions};
use crate::pipeline::NewsService;
use chrono::{DateTime, Timelike, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, instrument, warn};

/// Number of articles included in a digest.
pub const DIGEST_SIZE: usize = 5;

pub const MORNING_HOUR_UTC: u32 = 9;
pub const EVENING_HOUR_UTC: u32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestTime {
    Morning,
    Evening,
}

impl DigestTime {
    pub fn as_str(self) -> &'static str {
        match self {
            DigestTime::Morning => "Morning",
            DigestTime::Evening => "Evening",
        }
    }

    /// The edition scheduled for a UTC hour, if any.
    pub fn scheduled_at(hour: u32) -> Option<Self> {
        match hour {
            MORNING_HOUR_UTC => Some(DigestTime::Morning),
            EVENING_HOUR_UTC => Some(DigestTime::Evening),
            _ => None,
        }
    }

    /// An explicit override wins; otherwise use the schedule for `now`.
    pub fn resolve(forced: Option<DigestTime>, now: DateTime<Utc>) -> Option<Self> {
        forced.or_else(|| Self::scheduled_at(now.hour()))
    }

    pub fn subject(self) -> String {
        format!("📰 Your {self} News Digest from NewsHub")
    }
}

impl fmt::Display for DigestTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(DigestTime::Morning),
            "evening" => Ok(DigestTime::Evening),
            other => Err(format!("unknown digest time: {other}")),
        }
    }
}

/// Delivery counts for one digest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DigestReport {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
}

/// Send one rendered digest to every recipient concurrently. Every send is
/// awaited; one failure does not stop the others.
#[instrument(level = "info", skip_all, fields(%time, recipients = recipients.len()))]
pub async fn send_digest<E: EmailSender>(
    sender: &E,
    recipients: &[String],
    articles: &[CanonicalArticle],
    time: DigestTime,
) -> DigestReport {
    if recipients.is_empty() || articles.is_empty() {
        warn!(articles = articles.len(), "Nothing to send");
        return DigestReport::default();
    }

    let subject = time.subject();
    let html = render_digest_html(articles, time);
    let outcomes = join_all(
        recipients
            .iter()
            .map(|to| sender.send(to, &subject, &html)),
    )
    .await;

    let successful = outcomes.iter().filter(|sent| **sent).count();
    let report = DigestReport {
        successful,
        failed: outcomes.len() - successful,
        total: outcomes.len(),
    };
    info!(
        successful = report.successful,
        failed = report.failed,
        "Digest sending completed"
    );
    report
}

/// Full digest job: fetch articles, look up subscribers, send.
#[instrument(level = "info", skip_all, fields(%time))]
pub async fn run_digest<S, E>(
    news: &NewsService,
    store: &S,
    sender: &E,
    time: DigestTime,
) -> DigestReport
where
    S: SubscriberStore,
    E: EmailSender,
{
    let mut articles = news.get_news(NewsOptions::default()).await;
    articles.truncate(DIGEST_SIZE);

    let recipients = store.list_subscribers(time).await;
    info!(
        articles = articles.len(),
        recipients = recipients.len(),
        "Triggering digest"
    );
    send_digest(sender, &recipients, &articles, time).await
}
