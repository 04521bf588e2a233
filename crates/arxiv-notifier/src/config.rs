//! Configuration for the arXiv notifier.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveTime;

/// Default values.
pub mod defaults {
    use std::time::Duration;

    /// arXiv export API query endpoint.
    pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

    /// Subject fragment identifying the daily digest mail.
    pub const DIGEST_SUBJECT: &str = "quant-ph daily";

    /// Directory holding downloaded digest mails.
    pub const MAILDIR: &str = "mail";

    /// How many recent digest mails are considered per cycle.
    pub const RECENT_DIGESTS: usize = 5;

    /// Persisted interest list.
    pub const INTERESTS_FILE: &str = "interests.json";

    /// Results requested from the search API per cycle.
    pub const MAX_RESULTS: usize = 20;

    /// Local time of the daily notification.
    pub const DAILY_TIME: &str = "07:00";

    /// Bounded wait for one source fetch.
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

    /// Request timeout for HTTP calls.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Chat message size limit (Discord).
    pub const MESSAGE_LIMIT: usize = 2000;

    /// Prefix marking a chat line as a command.
    pub const COMMAND_PREFIX: &str = "!";

    /// User agent sent to arXiv.
    pub const USER_AGENT: &str = concat!("arxiv-notifier/", env!("CARGO_PKG_VERSION"));
}

/// Where papers come from each cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// Daily digest mails in a local mail directory
    #[default]
    Digest,
    /// arXiv search API
    Search,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "digest" => Ok(Self::Digest),
            "search" => Ok(Self::Search),
            other => Err(format!("unknown source '{other}' (expected digest or search)")),
        }
    }
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Paper source used by the fetch cycle.
    pub source: SourceKind,

    /// Directory scanned for digest mails.
    pub maildir: PathBuf,

    /// Subject fragment a digest mail must contain.
    pub digest_subject: String,

    /// Number of most recent digests handed to the freshness check.
    pub recent_digests: usize,

    /// Interest list file.
    pub interests_file: PathBuf,

    /// arXiv API endpoint (overridable for mock servers).
    pub arxiv_api_url: String,

    /// Maximum results per search.
    pub max_results: usize,

    /// Local time of the daily trigger.
    pub daily_time: NaiveTime,

    /// Bounded wait for a source fetch.
    pub fetch_timeout: Duration,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Outbound webhook; stdout is used when absent.
    pub webhook_url: Option<String>,

    /// Command prefix.
    pub command_prefix: String,

    /// Outbound message size limit.
    pub message_limit: usize,
}

impl Config {
    /// Create a test configuration pointing the API at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            source: SourceKind::Search,
            arxiv_api_url: format!("{}/api/query", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            fetch_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(source) = env_var("ARXIV_SOURCE") {
            config.source = source.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(dir) = env_var("MAILDIR") {
            config.maildir = PathBuf::from(dir);
        }
        if let Some(subject) = env_var("DIGEST_SUBJECT") {
            config.digest_subject = subject;
        }
        if let Some(path) = env_var("INTERESTS_FILE") {
            config.interests_file = PathBuf::from(path);
        }
        if let Some(url) = env_var("ARXIV_API_URL") {
            config.arxiv_api_url = url;
        }
        if let Some(n) = env_var("MAX_RESULTS") {
            config.max_results = n.parse()?;
        }
        if let Some(time) = env_var("DAILY_TIME") {
            config.daily_time = parse_daily_time(&time)?;
        }
        if let Some(secs) = env_var("FETCH_TIMEOUT_SECS") {
            config.fetch_timeout = Duration::from_secs(secs.parse()?);
        }
        config.webhook_url = env_var("WEBHOOK_URL");
        if let Some(prefix) = env_var("COMMAND_PREFIX") {
            config.command_prefix = prefix;
        }

        Ok(config)
    }

    /// Check if an outbound webhook is configured.
    #[must_use]
    pub const fn has_webhook(&self) -> bool {
        self.webhook_url.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            maildir: PathBuf::from(defaults::MAILDIR),
            digest_subject: defaults::DIGEST_SUBJECT.to_string(),
            recent_digests: defaults::RECENT_DIGESTS,
            interests_file: PathBuf::from(defaults::INTERESTS_FILE),
            arxiv_api_url: defaults::ARXIV_API_URL.to_string(),
            max_results: defaults::MAX_RESULTS,
            daily_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            fetch_timeout: defaults::FETCH_TIMEOUT,
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
            webhook_url: None,
            command_prefix: defaults::COMMAND_PREFIX.to_string(),
            message_limit: defaults::MESSAGE_LIMIT,
        }
    }
}

/// Parse an `HH:MM` local time.
///
/// # Errors
///
/// Returns error if the value is not a valid 24-hour time.
pub fn parse_daily_time(value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| anyhow::anyhow!("invalid daily time '{value}': {e}"))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
