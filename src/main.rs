//! `onyeakuko` binary: `news` prints or writes an article batch, `digest`
//! emails the scheduled edition to subscribers.

use chrono::Utc;
use clap::Parser;
use onyeakuko::cli::{Cli, Command, DigestArgs, NewsArgs};
use onyeakuko::config::{PipelineConfig, default_sources, load_sources};
use onyeakuko::digest::{
    DigestTime, InMemorySubscriberStore, MailtrapConfig, MailtrapSender, run_digest,
};
use onyeakuko::outputs::json;
use onyeakuko::pipeline::NewsService;
use onyeakuko::utils::ensure_writable_dir;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so `news` output on stdout stays valid JSON.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("onyeakuko starting up");

    let args = Cli::parse();
    debug!(?args.sources, per_source_limit = args.per_source_limit, "Parsed CLI arguments");

    let config = build_config(&args).await?;
    let news = NewsService::new(config)?;

    match args.command {
        Command::News(news_args) => run_news(&news, news_args).await?,
        Command::Digest(digest_args) => run_digest_command(&news, digest_args).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn build_config(args: &Cli) -> Result<PipelineConfig, Box<dyn Error>> {
    let sources = match &args.sources {
        Some(path) => load_sources(path).await?,
        None => default_sources(),
    };
    info!(count = sources.len(), "Source table ready");

    let config = PipelineConfig {
        sources,
        per_source_limit: args.per_source_limit,
        adapter_timeout: Duration::from_secs(args.adapter_timeout_secs),
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };
    Ok(config.with_api_keys(args.newsapi_key.as_deref(), args.mediastack_key.as_deref()))
}

#[instrument(level = "info", skip_all)]
async fn run_news(news: &NewsService, args: NewsArgs) -> Result<(), Box<dyn Error>> {
    let options = args.options();
    let articles = news.get_news(options).await;

    match &args.json_output_dir {
        Some(dir) => {
            if let Err(e) = ensure_writable_dir(dir).await {
                error!(
                    path = %dir,
                    error = %e,
                    "JSON output directory is not writable (fix perms or choose a different path)"
                );
                return Err(e);
            }
            json::write_articles(&articles, dir, options.time_range, Utc::now()).await?;
        }
        None => json::print_articles(&articles).await?,
    }
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_digest_command(news: &NewsService, args: DigestArgs) -> Result<(), Box<dyn Error>> {
    let now = Utc::now();
    let Some(time) = DigestTime::resolve(args.force, now) else {
        info!(
            hour = %now.format("%H"),
            "Not a scheduled digest time and no --force given"
        );
        return Ok(());
    };

    let store = InMemorySubscriberStore::from_yaml_file(&args.subscribers).await?;
    let sender = MailtrapSender::new(
        reqwest::Client::new(),
        MailtrapConfig {
            api_key: args.mailtrap_api_key,
            inbox_id: args.mailtrap_inbox_id,
            ..MailtrapConfig::default()
        },
    );

    let report = run_digest(news, &store, &sender, time).await;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
