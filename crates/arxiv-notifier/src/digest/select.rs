//! Choosing which digest mail to read.

use chrono::NaiveDate;

/// A digest mail as handed over by the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMessage {
    /// Mail subject.
    pub subject: String,
    /// Local calendar date the mail was sent.
    pub date: NaiveDate,
    /// Plain-text body.
    pub body: String,
}

/// Pick the digest dated yesterday relative to `today`.
///
/// Messages are ordered most recent first. Leading messages already dated
/// `today` are skipped before looking for yesterday's digest, since a digest
/// can arrive early and carry the run date.
#[must_use]
pub fn select_digest(messages: &[DigestMessage], today: NaiveDate) -> Option<&DigestMessage> {
    let yesterday = today.pred_opt()?;
    let mut ordered: Vec<&DigestMessage> = messages.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    ordered.into_iter().skip_while(|m| m.date == today).find(|m| m.date == yesterday)
}
