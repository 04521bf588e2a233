//! Where a cycle's papers come from.
//!
//! A source either yields papers, reports that nothing is available this
//! cycle (`Ok(None)`), or fails with a [`SourceError`]. The orchestrator
//! treats the last two the same way, but logs them differently.

mod arxiv;
mod mail;

pub use arxiv::{ArxivClient, ArxivEntry, ArxivSearchSource, build_query, parse_atom_feed};
pub use mail::{MailTransport, MaildirTransport, ParsedMail, parse_mail};

use chrono::NaiveDate;

use crate::digest::{parse_digest, select_digest};
use crate::error::SourceResult;
use crate::models::{InterestSet, Paper};

/// Inputs of one fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Current interest list.
    pub interests: &'a InterestSet,
    /// Local date of the run.
    pub today: NaiveDate,
    /// Cap on search results.
    pub max_results: usize,
}

/// Trait for paper sources.
#[async_trait::async_trait]
pub trait PaperSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Retrieve this cycle's papers, `None` when there is nothing to read.
    async fn fetch(&self, request: FetchRequest<'_>) -> SourceResult<Option<Vec<Paper>>>;
}

/// Papers from the daily digest mail.
pub struct DigestSource<T> {
    transport: T,
}

impl<T: MailTransport> DigestSource<T> {
    /// Wrap a mail transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }
}

#[async_trait::async_trait]
impl<T: MailTransport> PaperSource for DigestSource<T> {
    fn name(&self) -> &'static str {
        "digest"
    }

    async fn fetch(&self, request: FetchRequest<'_>) -> SourceResult<Option<Vec<Paper>>> {
        let messages = self.transport.recent_digests().await?;
        tracing::debug!(candidates = messages.len(), "Digest mails found");

        let Some(message) = select_digest(&messages, request.today) else {
            tracing::info!(today = %request.today, "No digest from yesterday");
            return Ok(None);
        };

        tracing::info!(subject = %message.subject, date = %message.date, "Reading digest");
        Ok(Some(parse_digest(&message.body)))
    }
}
