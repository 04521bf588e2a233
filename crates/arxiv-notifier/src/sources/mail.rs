//! Mail transport reading digests from a local mail directory.
//!
//! Mail retrieval itself (IMAP, fetchmail, ...) happens outside the bot;
//! this transport reads whatever landed in the directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use mailparse::MailHeaderMap;

use crate::digest::DigestMessage;
use crate::error::{SourceError, SourceResult};

/// Trait for mail transports.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    /// Recent digest mails, most recent first.
    async fn recent_digests(&self) -> SourceResult<Vec<DigestMessage>>;
}

/// Reads `.eml`-style files from a directory (and its `new/` and `cur/`).
#[derive(Debug, Clone)]
pub struct MaildirTransport {
    dir: PathBuf,
    subject_filter: String,
    limit: usize,
    offset: Option<FixedOffset>,
}

impl MaildirTransport {
    /// Transport over `dir`, keeping mails whose subject contains `subject_filter`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, subject_filter: impl Into<String>, limit: usize) -> Self {
        Self { dir: dir.into(), subject_filter: subject_filter.into(), limit, offset: None }
    }

    /// Compute mail dates in a fixed offset instead of the local timezone.
    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    async fn message_files(&self) -> SourceResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir in [self.dir.clone(), self.dir.join("new"), self.dir.join("cur")] {
            if dir != self.dir && !tokio::fs::try_exists(&dir).await? {
                continue;
            }
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    files.push(entry.path());
                }
            }
        }
        Ok(files)
    }

    fn local_date(&self, sent: DateTime<FixedOffset>) -> NaiveDate {
        match self.offset {
            Some(offset) => sent.with_timezone(&offset).date_naive(),
            None => sent.with_timezone(&Local).date_naive(),
        }
    }
}

#[async_trait::async_trait]
impl MailTransport for MaildirTransport {
    async fn recent_digests(&self) -> SourceResult<Vec<DigestMessage>> {
        let mut found: Vec<(DateTime<FixedOffset>, DigestMessage)> = Vec::new();

        for path in self.message_files().await? {
            let raw = tokio::fs::read(&path).await?;
            match parse_mail(&raw) {
                Ok(mail) if mail.subject.contains(&self.subject_filter) => {
                    let date = self.local_date(mail.sent);
                    found.push((
                        mail.sent,
                        DigestMessage { subject: mail.subject, date, body: mail.body },
                    ));
                }
                Ok(_) => {}
                Err(e) => log_skipped(&path, &e),
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0));
        found.truncate(self.limit);
        Ok(found.into_iter().map(|(_, message)| message).collect())
    }
}

fn log_skipped(path: &Path, err: &SourceError) {
    tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable mail");
}

/// Headers and decoded body of one mail.
#[derive(Debug, Clone)]
pub struct ParsedMail {
    /// Subject header.
    pub subject: String,
    /// Date header.
    pub sent: DateTime<FixedOffset>,
    /// Plain-text body, transfer encoding and charset decoded, without carriage returns.
    pub body: String,
}

/// Parse a raw RFC 2822 message into subject, date and decoded body.
///
/// Quoted-printable and base64 bodies are decoded; for multipart mail the
/// first `text/plain` part is used. A trailing comment in the date
/// (`... -0400 (EDT)`) is ignored.
pub fn parse_mail(raw: &[u8]) -> SourceResult<ParsedMail> {
    let mail = mailparse::parse_mail(raw)?;

    let subject = mail.headers.get_first_value("Subject").unwrap_or_default();
    let date = mail
        .headers
        .get_first_value("Date")
        .ok_or_else(|| SourceError::Malformed("missing Date header".into()))?;
    let sent = parse_date(&date)?;

    let body = plain_text_part(&mail).get_body()?.replace('\r', "");

    Ok(ParsedMail { subject, sent, body })
}

fn parse_date(value: &str) -> SourceResult<DateTime<FixedOffset>> {
    let value = value.trim();
    let value = match value.rfind(" (") {
        Some(idx) if value.ends_with(')') => &value[..idx],
        _ => value,
    };
    DateTime::parse_from_rfc2822(value.trim())
        .map_err(|e| SourceError::Malformed(format!("bad Date header '{value}': {e}")))
}

fn plain_text_part<'m, 'a>(mail: &'m mailparse::ParsedMail<'a>) -> &'m mailparse::ParsedMail<'a> {
    if mail.subparts.is_empty() {
        return mail;
    }
    mail.subparts
        .iter()
        .map(|part| plain_text_part(part))
        .find(|part| part.ctype.mimetype.eq_ignore_ascii_case("text/plain"))
        .unwrap_or(mail)
}
