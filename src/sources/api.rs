//! Shared JSON query helper for the structured news APIs.

use crate::error::SourceError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// Issue one GET with query parameters and decode the JSON body.
///
/// Non-2xx responses become [`SourceError::Status`]; the body is logged
/// (truncated) so provider error messages are not lost.
#[instrument(level = "debug", skip_all, fields(%url, source = source_name))]
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    source_name: &str,
) -> Result<T, SourceError> {
    let response = client.get(url).query(params).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(
            source = source_name,
            status = status.as_u16(),
            body = %truncate_for_log(&body, 300),
            "Provider returned non-success status"
        );
        return Err(SourceError::Status {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }

    debug!(source = source_name, bytes = body.len(), "Provider response received");
    Ok(serde_json::from_str(&body)?)
}

/// Trim a provider string, dropping it when empty.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
