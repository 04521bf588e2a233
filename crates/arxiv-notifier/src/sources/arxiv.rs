//! arXiv search API client.
//!
//! Provides async HTTP client with:
//! - Retry middleware with exponential backoff
//! - Status code mapping into [`ClientError`]
//! - Atom feed parsing into [`Paper`] records

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use super::{FetchRequest, PaperSource};
use crate::config::{Config, defaults};
use crate::digest::normalize_text;
use crate::error::{ClientError, ClientResult, SourceResult};
use crate::http::check_status;
use crate::models::{InterestSet, Paper};

/// arXiv API client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Query endpoint.
    api_url: String,

    /// Request timeout, reported on timeouts.
    request_timeout: Duration,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a URL or HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        url::Url::parse(&config.arxiv_api_url)?;

        let client = Client::builder()
            .user_agent(defaults::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(3);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_url: config.arxiv_api_url.clone(),
            request_timeout: config.request_timeout,
        })
    }

    /// Run a search query, newest submissions first.
    ///
    /// # Errors
    ///
    /// Returns error on API failure or an unreadable feed.
    pub async fn search(&self, query: &str, max_results: usize) -> ClientResult<Vec<ArxivEntry>> {
        let params = [
            ("search_query", query.to_string()),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ];

        tracing::debug!(query, max_results, "Querying arXiv");

        let response = self.client.get(&self.api_url).query(&params).send().await.map_err(
            |e| match e {
                reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                    ClientError::Timeout(self.request_timeout)
                }
                other => ClientError::from(other),
            },
        )?;

        let response = check_status(response).await?;
        let body = response.text().await?;
        parse_atom_feed(&body)
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient").field("api_url", &self.api_url).finish()
    }
}

/// One `<entry>` of an arXiv Atom feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArxivEntry {
    /// Entry id URL (`http://arxiv.org/abs/2401.00001v1`).
    pub id: String,
    /// Raw title.
    pub title: String,
    /// Raw summary.
    pub summary: String,
    /// Author names.
    pub authors: Vec<String>,
    /// Category terms.
    pub categories: Vec<String>,
    /// Abstract page link.
    pub link: Option<String>,
    /// Last update timestamp (RFC 3339).
    pub updated: String,
}

impl ArxivEntry {
    /// Short arXiv identifier without version suffix.
    #[must_use]
    pub fn short_id(&self) -> String {
        let id = self.id.trim();
        let id = id.split_once("/abs/").map_or(id, |(_, rest)| rest);
        match id.rsplit_once('v') {
            Some((base, version))
                if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) =>
            {
                base.to_string()
            }
            _ => id.to_string(),
        }
    }

    /// Local date of the last update.
    #[must_use]
    pub fn updated_date(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(self.updated.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Local).date_naive())
    }

    /// Normalize into the shared paper shape.
    #[must_use]
    pub fn into_paper(self) -> Paper {
        let id = self.short_id();
        let link = self.link.unwrap_or_else(|| format!("https://arxiv.org/abs/{id}"));
        Paper::new(
            id,
            normalize_text(&self.title),
            self.authors.iter().map(|a| normalize_text(a)).collect(),
            self.categories.join(" "),
            normalize_text(&self.summary),
            link,
        )
    }
}

#[derive(Clone, Copy)]
enum Field {
    Id,
    Title,
    Summary,
    Updated,
    AuthorName,
}

/// Parse an arXiv Atom feed.
///
/// # Errors
///
/// Returns [`ClientError::Feed`] on malformed XML.
pub fn parse_atom_feed(xml: &str) -> ClientResult<Vec<ArxivEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut entries = Vec::new();
    let mut current: Option<ArxivEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if current.is_none() => {
                if e.local_name().as_ref() == b"entry" {
                    current = Some(ArxivEntry::default());
                }
            }
            Ok(Event::Start(e)) => {
                if let Some(entry) = current.as_mut() {
                    field = match e.local_name().as_ref() {
                        b"id" => Some(Field::Id),
                        b"title" => Some(Field::Title),
                        b"summary" => Some(Field::Summary),
                        b"updated" => Some(Field::Updated),
                        b"name" => Some(Field::AuthorName),
                        _ => {
                            read_empty_element(entry, &e);
                            None
                        }
                    };
                    if matches!(field, Some(Field::AuthorName)) {
                        entry.authors.push(String::new());
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if let Some(entry) = current.as_mut() {
                    read_empty_element(entry, &e);
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    let text = t.unescape().map_err(|e| ClientError::Feed(e.to_string()))?;
                    let target = match f {
                        Field::Id => &mut entry.id,
                        Field::Title => &mut entry.title,
                        Field::Summary => &mut entry.summary,
                        Field::Updated => &mut entry.updated,
                        Field::AuthorName => match entry.authors.last_mut() {
                            Some(name) => name,
                            None => {
                                buf.clear();
                                continue;
                            }
                        },
                    };
                    target.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                field = None;
                if e.local_name().as_ref() == b"entry" {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ClientError::Feed(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

/// Pick up `<category term=..>` and `<link ..>` attributes.
fn read_empty_element(entry: &mut ArxivEntry, e: &BytesStart<'_>) {
    let attr = |key: &[u8]| {
        e.attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key)
            .map(|a| String::from_utf8_lossy(&a.value).into_owned())
    };

    match e.local_name().as_ref() {
        b"category" => {
            if let Some(term) = attr(b"term") {
                if !entry.categories.contains(&term) {
                    entry.categories.push(term);
                }
            }
        }
        b"link" => {
            if attr(b"rel").as_deref() == Some("alternate") && entry.link.is_none() {
                entry.link = attr(b"href");
            }
        }
        _ => {}
    }
}

/// Build the arXiv `search_query` for an interest list.
///
/// Categories scope the search; authors (by surname) and keywords widen it.
/// Returns `None` when the list is empty.
#[must_use]
pub fn build_query(interests: &InterestSet) -> Option<String> {
    let categories: Vec<String> =
        interests.categories().iter().map(|c| format!("cat:{}", c.trim())).collect();

    let mut terms: Vec<String> = interests
        .authors()
        .iter()
        .filter_map(|a| a.split_whitespace().last())
        .map(|surname| format!("au:{surname}"))
        .collect();
    terms.extend(interests.keywords().iter().map(|k| format!("all:\"{}\"", k.trim())));

    match (categories.is_empty(), terms.is_empty()) {
        (true, true) => None,
        (false, true) => Some(categories.join(" OR ")),
        (true, false) => Some(terms.join(" OR ")),
        (false, false) => Some(format!("({}) AND ({})", categories.join(" OR "), terms.join(" OR "))),
    }
}

/// Papers from the arXiv search API, updated today or yesterday.
#[derive(Debug, Clone)]
pub struct ArxivSearchSource {
    client: ArxivClient,
}

impl ArxivSearchSource {
    /// Wrap a client.
    #[must_use]
    pub const fn new(client: ArxivClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PaperSource for ArxivSearchSource {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn fetch(&self, request: FetchRequest<'_>) -> SourceResult<Option<Vec<Paper>>> {
        let Some(query) = build_query(request.interests) else {
            tracing::info!("Interest list is empty, nothing to search");
            return Ok(None);
        };

        let entries = self.client.search(&query, request.max_results).await?;
        let since = request.today.pred_opt().unwrap_or(request.today);
        let total = entries.len();

        let papers: Vec<Paper> = entries
            .into_iter()
            .filter(|e| e.updated_date().is_some_and(|d| d >= since))
            .map(ArxivEntry::into_paper)
            .collect();

        tracing::debug!(total, recent = papers.len(), "arXiv search done");
        Ok(Some(papers))
    }
}
