//! Error types for source adapters and the digest collaborators.
//!
//! None of these reach a [`crate::pipeline::NewsService::get_news`] caller:
//! adapter errors are logged and turned into empty results at the adapter
//! boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} returned status {status}")]
    Status { source_name: String, status: u16 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("select at least one digest time")]
    NoDigestTime,

    #[error("subscriber file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("subscriber file parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
