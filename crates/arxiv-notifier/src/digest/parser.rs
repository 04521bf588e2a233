//! Digest parser.
//!
//! A digest is a run of entries separated by dashed lines. Each entry looks
//! like:
//!
//! ```text
//! \\
//! arXiv:2310.01234
//! Date: Mon, 16 Oct 2023 18:00:01 GMT   (812kb)
//!
//! Title: A title that may
//!   span lines
//! Authors: A. One, B. Two and C. Three
//! Categories: quant-ph cond-mat.supr-con
//! Comments: 12 pages
//! \\
//!   Abstract text, possibly
//! over several lines.
//! \\ ( https://arxiv.org/abs/2310.01234 ,  812kb)
//! ```
//!
//! Segments that do not follow this layout (headers, replacement notices,
//! footers) produce no paper.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Paper;

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-{20,}[ \t]*$").expect("valid separator pattern"));

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)\\\\[ \t]*\narXiv:(?P<id>[^\n]*)\n",
        r"Date:(?P<date>[^\n]*)\n[ \t]*\n",
        r"Title:(?P<title>.*?)\n",
        r"Authors:(?P<authors>.*?)\n",
        r"Categories:(?P<categories>[^\n]*)\n",
        r".*?\\\\[ \t]*\n",
        r"(?P<abstract>.*?)",
        r"\\\\\s*\(\s*(?P<link>[^\s,)]+)",
    ))
    .expect("valid entry pattern")
});

static SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" {2,}").expect("valid spaces pattern"));

/// Extract every well-formed entry of a digest, in source order.
#[must_use]
pub fn parse_digest(text: &str) -> Vec<Paper> {
    let text = text.replace('\r', "");
    let mut papers = Vec::new();
    let mut skipped = 0usize;

    for segment in SEPARATOR.split(&text) {
        let before = papers.len();
        for caps in ENTRY.captures_iter(segment) {
            let authors = split_authors(&caps["authors"]);
            papers.push(Paper::new(
                caps["id"].trim(),
                normalize_text(&caps["title"]),
                authors,
                caps["categories"].trim(),
                normalize_text(&caps["abstract"]),
                caps["link"].trim(),
            ));
        }
        if papers.len() == before && !segment.trim().is_empty() {
            skipped += 1;
            tracing::trace!(chars = segment.len(), "Digest segment without entry");
        }
    }

    tracing::debug!(papers = papers.len(), skipped, "Parsed digest");
    papers
}

/// Collapse a multi-line field into one line.
///
/// Trims, turns newlines into spaces and collapses runs of spaces. Applying
/// it twice gives the same result as applying it once.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let joined = raw.trim().replace('\n', " ");
    SPACES.replace_all(&joined, " ").into_owned()
}

/// Split an authors field into full names.
///
/// `" and "` is rewritten to `", "` before splitting so the last two authors
/// stay separate.
#[must_use]
pub fn split_authors(raw: &str) -> Vec<String> {
    let joined = raw.trim().replace('\n', " ").replace(" and ", ", ");
    SPACES
        .replace_all(&joined, " ")
        .split(", ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY_TEXT: &str = "\\\\\narXiv:2310.01234\nDate: Mon, 16 Oct 2023 18:00:01 GMT   (812kb)\n\nTitle: Broadband  traveling-wave\n  parametric amplifiers\nAuthors: A. One, B. Two and\n  C. Three\nCategories: quant-ph cond-mat.supr-con\nComments: 12 pages\n\\\\\n  We present a TWPA with\nnear quantum-limited noise.\n\\\\ ( https://arxiv.org/abs/2310.01234 ,  812kb)\n";

    #[test]
    fn test_parse_single_entry() {
        let papers = parse_digest(ENTRY_TEXT);
        assert_eq!(papers.len(), 1);
        let p = &papers[0];
        assert_eq!(p.id, "2310.01234");
        assert_eq!(p.title, "Broadband traveling-wave parametric amplifiers");
        assert_eq!(p.authors, ["A. One", "B. Two", "C. Three"]);
        assert_eq!(p.categories, "quant-ph cond-mat.supr-con");
        assert_eq!(p.r#abstract, "We present a TWPA with near quantum-limited noise.");
        assert_eq!(p.link, "https://arxiv.org/abs/2310.01234");
        assert!(p.matching.is_empty());
    }

    #[test]
    fn test_parse_handles_crlf() {
        let crlf = ENTRY_TEXT.replace('\n', "\r\n");
        let papers = parse_digest(&crlf);
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].authors.len(), 3);
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(parse_digest("").is_empty());
        assert!(parse_digest("Submissions to: quant-ph\nreceived from Mon 16 Oct").is_empty());
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a\nb   c \n"), "a b c");
        assert_eq!(normalize_text("already clean"), "already clean");
    }

    #[test]
    fn test_split_authors_replacement_before_split() {
        assert_eq!(split_authors("A. One and B. Two, C. Three"), ["A. One", "B. Two", "C. Three"]);
        assert_eq!(split_authors("Solo Author"), ["Solo Author"]);
        assert_eq!(split_authors("X. Y and\n   Z. W"), ["X. Y", "Z. W"]);
    }
}
