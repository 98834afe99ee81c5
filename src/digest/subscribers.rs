//! Subscriber storage boundary and an in-memory implementation.

use super::DigestTime;
use crate::error::DigestError;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{info, instrument};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Source of digest recipients.
pub trait SubscriberStore {
    /// Emails of everyone subscribed to the given digest.
    async fn list_subscribers(&self, time: DigestTime) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DigestPreferences {
    #[serde(default)]
    pub morning: bool,
    #[serde(default)]
    pub evening: bool,
}

impl DigestPreferences {
    pub fn wants(&self, time: DigestTime) -> bool {
        match time {
            DigestTime::Morning => self.morning,
            DigestTime::Evening => self.evening,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub email: String,
    pub digest_times: DigestPreferences,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    Updated,
}

#[derive(Debug, Deserialize)]
struct SubscriberFile {
    subscribers: Vec<SubscriberEntry>,
}

#[derive(Debug, Deserialize)]
struct SubscriberEntry {
    email: String,
    #[serde(flatten)]
    digest_times: DigestPreferences,
}

/// Subscriptions keyed by lowercased email.
#[derive(Debug, Default)]
pub struct InMemorySubscriberStore {
    subscriptions: RwLock<BTreeMap<String, Subscription>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from YAML:
    ///
    /// ```yaml
    /// subscribers:
    ///   - email: ada@example.com
    ///     morning: true
    ///     evening: false
    /// ```
    #[instrument(level = "info", skip_all, fields(%path))]
    pub async fn from_yaml_file(path: &str) -> Result<Self, DigestError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&text).await
    }

    pub async fn from_yaml(yaml: &str) -> Result<Self, DigestError> {
        let file: SubscriberFile = serde_yaml::from_str(yaml)?;
        let store = Self::new();
        for entry in file.subscribers {
            store.subscribe(&entry.email, entry.digest_times).await?;
        }
        info!(count = store.len().await, "Loaded subscribers");
        Ok(store)
    }

    /// Add or update a subscription. The email is lowercased; at least one
    /// digest time must be selected.
    pub async fn subscribe(
        &self,
        email: &str,
        digest_times: DigestPreferences,
    ) -> Result<SubscribeOutcome, DigestError> {
        let email = email.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(DigestError::InvalidEmail(email));
        }
        if !digest_times.morning && !digest_times.evening {
            return Err(DigestError::NoDigestTime);
        }

        let mut subscriptions = self.subscriptions.write().await;
        if let Some(existing) = subscriptions.get_mut(&email) {
            existing.digest_times = digest_times;
            return Ok(SubscribeOutcome::Updated);
        }

        info!(%email, ?digest_times, "New subscription");
        subscriptions.insert(
            email.clone(),
            Subscription {
                email,
                digest_times,
                subscribed_at: Utc::now(),
            },
        );
        Ok(SubscribeOutcome::Created)
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}

impl SubscriberStore for InMemorySubscriberStore {
    async fn list_subscribers(&self, time: DigestTime) -> Vec<String> {
        self.subscriptions
            .read()
            .await
            .values()
            .filter(|s| s.digest_times.wants(time))
            .map(|s| s.email.clone())
            .collect()
    }
}
