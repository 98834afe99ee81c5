//! JSON output for article batches.
//!
//! Files are grouped by UTC date and named after the requested time range,
//! so a later run for the same range and day replaces the earlier file.

use crate::models::{CanonicalArticle, TimeRange};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncWriteExt, stdout};
use tracing::{error, info, instrument};

/// File stem for a time range; `None` means unwindowed.
pub fn range_label(time_range: Option<TimeRange>) -> &'static str {
    time_range.map_or("all", TimeRange::as_str)
}

/// `{json_output_dir}/{YYYY-MM-DD}/{range}.json`
pub fn output_path(
    json_output_dir: &str,
    time_range: Option<TimeRange>,
    now: DateTime<Utc>,
) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(now.date_naive().to_string())
        .join(format!("{}.json", range_label(time_range)))
}

/// Write a batch to its dated JSON file, creating directories as needed.
///
/// # Arguments
///
/// * `articles` - The batch to serialize
/// * `json_output_dir` - Base directory for JSON output
/// * `time_range` - Requested window, which names the file
/// * `now` - Instant whose UTC date names the directory
///
/// # Returns
///
/// The path written, `{json_output_dir}/{YYYY-MM-DD}/{range}.json`.
///
/// # Errors
///
/// Fails if serialization, directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, count = articles.len()))]
pub async fn write_articles(
    articles: &[CanonicalArticle],
    json_output_dir: &str,
    time_range: Option<TimeRange>,
    now: DateTime<Utc>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;
    let path = output_path(json_output_dir, time_range, now);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON file");
    Ok(path)
}

/// Print a batch to stdout as pretty JSON.
pub async fn print_articles(articles: &[CanonicalArticle]) -> Result<(), Box<dyn Error>> {
    let mut json = serde_json::to_string_pretty(articles)?;
    json.push('\n');
    let mut out = stdout();
    out.write_all(json.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
