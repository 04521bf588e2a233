//! Digest parsing, digest selection and the Maildir-backed digest source.

use chrono::{NaiveDate, TimeDelta};

use arxiv_notifier::digest::{DigestMessage, parse_digest, select_digest};
use arxiv_notifier::models::InterestSet;
use arxiv_notifier::sources::{
    DigestSource, FetchRequest, MailTransport, MaildirTransport, PaperSource,
};
use arxiv_notifier::error::SourceResult;

const SEPARATOR: &str =
    "------------------------------------------------------------------------------";

const HEADER: &str = "Submissions to:\nQuantum Physics\nreceived from  Mon  4 Mar 24 19:00:00 GMT  to  Tue  5 Mar 24 19:00:00 GMT\n";

fn entry(id: &str, title: &str, authors: &str, r#abstract: &str) -> String {
    format!(
        "\\\\\narXiv:{id}\nDate: Tue, 5 Mar 2024 14:03:11 GMT   (1021kb,D)\n\nTitle: {title}\nAuthors: {authors}\nCategories: quant-ph cond-mat.supr-con\nComments: 9 pages, 5 figures\n\\\\\n  {abstract}\n\\\\ ( https://arxiv.org/abs/{id} ,  1021kb)\n"
    )
}

fn digest(segments: &[String]) -> String {
    let mut text = HEADER.to_string();
    for segment in segments {
        text.push_str(SEPARATOR);
        text.push('\n');
        text.push_str(segment);
    }
    text.push_str(SEPARATOR);
    text.push_str("\n%%--%%--%%\n");
    text
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

// =============================================================================
// Parser
// =============================================================================

#[test]
fn test_parse_full_digest() {
    let text = digest(&[
        entry("2403.00001", "Kinetic inductance\n  amplifiers", "A. One and B. Two", "First\nabstract."),
        entry("2403.00002", "Second paper", "C. Three, D. Four and E. Five", "Second abstract."),
    ]);

    let papers = parse_digest(&text);
    assert_eq!(papers.len(), 2);

    assert_eq!(papers[0].id, "2403.00001");
    assert_eq!(papers[0].title, "Kinetic inductance amplifiers");
    assert_eq!(papers[0].authors, ["A. One", "B. Two"]);
    assert_eq!(papers[0].r#abstract, "First abstract.");
    assert_eq!(papers[0].link, "https://arxiv.org/abs/2403.00001");

    assert_eq!(papers[1].authors, ["C. Three", "D. Four", "E. Five"]);
    assert!(papers.iter().all(|p| p.matching.is_empty()));
}

#[test]
fn test_malformed_entry_does_not_affect_neighbours() {
    let broken = "\\\\\narXiv:2403.00009\nDate: Tue, 5 Mar 2024\n\nTitle: No authors line here\nCategories: quant-ph\n\\\\\n  Lost.\n\\\\ ( https://arxiv.org/abs/2403.00009 ,  1kb)\n".to_string();
    let text = digest(&[
        entry("2403.00001", "One", "A. One", "a"),
        broken,
        entry("2403.00002", "Two", "B. Two", "b"),
    ]);

    let ids: Vec<String> = parse_digest(&text).into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["2403.00001", "2403.00002"]);
}

#[test]
fn test_replacement_notices_are_skipped() {
    let text = digest(&[
        entry("2403.00001", "One", "A. One", "a"),
        "\\\\\narXiv:2301.00001\nreplaced with revised version Tue, 5 Mar 2024 10:00:00 GMT   (20kb)\n\nTitle: Old\nAuthors: Z. Zed\nCategories: quant-ph\n\\\\ ( https://arxiv.org/abs/2301.00001 ,  20kb)\n".to_string(),
    ]);

    let papers = parse_digest(&text);
    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].id, "2403.00001");
}

#[test]
fn test_parse_without_entries() {
    assert!(parse_digest(&digest(&[])).is_empty());
}

// =============================================================================
// Selection
// =============================================================================

fn message(body: &str, date: NaiveDate) -> DigestMessage {
    DigestMessage { subject: "quant-ph daily Subj-class mailing 100".into(), date, body: body.into() }
}

#[test]
fn test_select_yesterday_after_early_arrival() {
    let messages = [message("today", day(6)), message("yesterday", day(5)), message("older", day(4))];
    assert_eq!(select_digest(&messages, day(6)).map(|m| m.body.as_str()), Some("yesterday"));
}

#[test]
fn test_select_none_when_yesterday_missing() {
    let messages = [message("today", day(6)), message("older", day(3))];
    assert!(select_digest(&messages, day(6)).is_none());
    assert!(select_digest(&[], day(6)).is_none());
}

// =============================================================================
// Digest source
// =============================================================================

struct FixedMail(Vec<DigestMessage>);

#[async_trait::async_trait]
impl MailTransport for FixedMail {
    async fn recent_digests(&self) -> SourceResult<Vec<DigestMessage>> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn test_digest_source_reads_yesterdays_mail() {
    let body = digest(&[entry("2403.00001", "One", "A. One", "a")]);
    let source = DigestSource::new(FixedMail(vec![message(&body, day(5))]));
    let interests = InterestSet::default();

    let papers = source
        .fetch(FetchRequest { interests: &interests, today: day(6), max_results: 20 })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(papers.len(), 1);
}

#[tokio::test]
async fn test_digest_source_without_fresh_mail() {
    let body = digest(&[entry("2403.00001", "One", "A. One", "a")]);
    let source = DigestSource::new(FixedMail(vec![message(&body, day(2))]));
    let interests = InterestSet::default();

    let papers = source
        .fetch(FetchRequest { interests: &interests, today: day(6), max_results: 20 })
        .await
        .unwrap();
    assert!(papers.is_none());
}

fn mail_file(subject: &str, date: &str, body: &str) -> String {
    format!("From: no-reply@arxiv.org\r\nSubject: {subject}\r\nDate: {date}\r\n\r\n{body}")
}

#[tokio::test]
async fn test_maildir_transport_filters_and_orders() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("new")).unwrap();

    std::fs::write(
        dir.path().join("a.eml"),
        mail_file("quant-ph daily Subj-class mailing 1", "Mon, 04 Mar 2024 20:00:00 +0000", "older"),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("new").join("b.eml"),
        mail_file("quant-ph daily Subj-class mailing 2", "Tue, 05 Mar 2024 20:00:00 +0000", "newer"),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("c.eml"),
        mail_file("Your newsletter", "Tue, 05 Mar 2024 21:00:00 +0000", "spam"),
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.eml"), "not a mail").unwrap();

    let utc = chrono::FixedOffset::east_opt(0).unwrap();
    let transport = MaildirTransport::new(dir.path(), "quant-ph daily", 5).with_offset(utc);
    let messages = transport.recent_digests().await.unwrap();

    let bodies: Vec<&str> = messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, ["newer", "older"]);
    assert_eq!(messages[0].date, day(5));
}

#[tokio::test]
async fn test_maildir_transport_limit() {
    let dir = tempfile::tempdir().unwrap();
    let start = day(1);
    for i in 0..4 {
        let date = (start + TimeDelta::days(i)).format("%a, %d %b %Y 20:00:00 +0000").to_string();
        std::fs::write(dir.path().join(format!("{i}.eml")), mail_file("quant-ph daily", &date, "x"))
            .unwrap();
    }

    let transport = MaildirTransport::new(dir.path(), "quant-ph daily", 2);
    assert_eq!(transport.recent_digests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_maildir_transport_decodes_quoted_printable_digest() {
    let dir = tempfile::tempdir().unwrap();
    let body = digest(&[entry("2403.00001", "Long titles that w=\nrap", "Andr=C3=A9 One and B. Two", "a")])
        .replace('\n', "\r\n");
    let raw = format!(
        "From: no-reply@arxiv.org\r\nSubject: quant-ph daily\r\nDate: Tue, 05 Mar 2024 20:00:00 +0000\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: quoted-printable\r\n\r\n{body}"
    );
    std::fs::write(dir.path().join("qp.eml"), raw).unwrap();

    let transport = MaildirTransport::new(dir.path(), "quant-ph daily", 5);
    let messages = transport.recent_digests().await.unwrap();
    assert_eq!(messages.len(), 1);

    let mut papers = parse_digest(&messages[0].body);
    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].title, "Long titles that wrap");
    assert_eq!(papers[0].authors, ["André One", "B. Two"]);

    arxiv_notifier::matcher::match_authors(&mut papers[0], &["André One".to_string()]);
    assert_eq!(papers[0].matching, ["André One"]);
}

#[tokio::test]
async fn test_maildir_transport_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let transport = MaildirTransport::new(dir.path().join("nope"), "quant-ph daily", 5);
    assert!(transport.recent_digests().await.is_err());
}
