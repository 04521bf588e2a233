//! arXiv Notifier - Entry Point
//!
//! Reads commands from stdin, posts to a webhook (or stdout) and fetches new
//! papers once a day.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_notifier::bot::{
    BotContext, BotSettings, Channel, StdioChannel, WebhookChannel, run_command_loop, send_all,
};
use arxiv_notifier::config::{Config, SourceKind, parse_daily_time};
use arxiv_notifier::scheduler::{local_today, run_daily};
use arxiv_notifier::sources::{
    ArxivClient, ArxivSearchSource, DigestSource, MaildirTransport, PaperSource,
};
use arxiv_notifier::store::InterestStore;

#[derive(Parser, Debug)]
#[command(name = "arxiv-notifier")]
#[command(about = "Posts new arXiv papers matching your interests")]
#[command(version)]
struct Cli {
    /// Where papers come from: digest or search
    #[arg(long, env = "ARXIV_SOURCE")]
    source: Option<SourceKind>,

    /// Maildir holding the digest mails
    #[arg(long, env = "MAILDIR")]
    maildir: Option<PathBuf>,

    /// Interest list file
    #[arg(long, env = "INTERESTS_FILE")]
    interests_file: Option<PathBuf>,

    /// Discord-compatible webhook URL (stdout when absent)
    #[arg(long, env = "WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Local time of the daily fetch (HH:MM)
    #[arg(long, env = "DAILY_TIME")]
    daily_time: Option<String>,

    /// Run a single cycle, post it and exit
    #[arg(long)]
    once: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn apply(&self, mut config: Config) -> anyhow::Result<Config> {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(dir) = &self.maildir {
            config.maildir.clone_from(dir);
        }
        if let Some(path) = &self.interests_file {
            config.interests_file.clone_from(path);
        }
        if self.webhook_url.is_some() {
            config.webhook_url.clone_from(&self.webhook_url);
        }
        if let Some(time) = &self.daily_time {
            config.daily_time = parse_daily_time(time)?;
        }
        Ok(config)
    }
}

fn init_tracing(log_level: &str, json: bool) {
    // Logs go to stderr; stdout carries the stdio channel.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn build_source(config: &Config) -> anyhow::Result<Box<dyn PaperSource>> {
    Ok(match config.source {
        SourceKind::Digest => Box::new(DigestSource::new(MaildirTransport::new(
            &config.maildir,
            &config.digest_subject,
            config.recent_digests,
        ))),
        SourceKind::Search => Box::new(ArxivSearchSource::new(ArxivClient::new(config)?)),
    })
}

fn build_channel(config: &Config) -> anyhow::Result<Arc<dyn Channel>> {
    Ok(match &config.webhook_url {
        Some(url) => Arc::new(WebhookChannel::new(url, config)?),
        None => Arc::new(StdioChannel),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let config = cli.apply(Config::from_env()?)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        source = ?config.source,
        interests = %config.interests_file.display(),
        webhook = config.has_webhook(),
        "Starting arXiv notifier"
    );

    let source = build_source(&config)?;
    let store = InterestStore::new(&config.interests_file);
    let ctx = BotContext::load(source, store, BotSettings::from(&config)).await?.shared();
    let channel = build_channel(&config)?;

    if cli.once {
        let messages = ctx.lock().await.fetch(local_today()).await;
        send_all(channel.as_ref(), &messages, config.message_limit).await;
        return Ok(());
    }

    // Fill today's result so `abstract` works before the first trigger.
    ctx.lock().await.fetch(local_today()).await;

    let daily = tokio::spawn(run_daily(ctx.clone(), channel.clone(), config.daily_time));

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        res = run_command_loop(stdin, channel.as_ref(), ctx) => {
            res?;
            tracing::info!("Commands closed, continuing with the daily schedule");
            tokio::select! {
                res = daily => res?,
                _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, shutting down"),
            }
        }
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, shutting down"),
    }

    Ok(())
}
