//! Interest matching over parsed papers.

use arxiv_notifier::matcher::{apply_interests, match_authors, match_keywords};
use arxiv_notifier::models::{InterestSet, Paper};

fn paper(authors: &[&str], title: &str, r#abstract: &str) -> Paper {
    Paper::new(
        "2403.00001",
        title,
        authors.iter().map(|a| (*a).to_string()).collect(),
        "quant-ph",
        r#abstract,
        "https://arxiv.org/abs/2403.00001",
    )
}

#[test]
fn test_author_match_uses_initial_and_surname() {
    let mut p = paper(&["Jane Quincy Public", "John Doe"], "t", "a");
    match_authors(&mut p, &["Jane Q. Public"]);
    assert_eq!(p.matching, ["Jane Q. Public"]);
}

#[test]
fn test_author_match_accepts_other_first_name_with_same_initial() {
    let mut p = paper(&["Janet Public"], "t", "a");
    match_authors(&mut p, &["Jane Q. Public"]);
    assert_eq!(p.matching, ["Jane Q. Public"]);
}

#[test]
fn test_author_match_rejects_other_initial_or_surname() {
    let mut p = paper(&["Mary Public", "Jane Private"], "t", "a");
    match_authors(&mut p, &["Jane Q. Public"]);
    assert!(p.matching.is_empty());
}

#[test]
fn test_keyword_match_is_case_insensitive_substring() {
    let mut p = paper(&["A. One"], "Noise in TWPAs", "qubit readout");
    match_keywords(&mut p, &["twpa", "Qubit", "RFSoC"]);
    assert_eq!(p.matching, ["twpa", "Qubit"]);
}

#[test]
fn test_matching_grows_only() {
    let mut p = paper(&["Jane Public"], "TWPA", "x");
    p.matching.push("earlier".into());
    apply_interests(&mut p, &InterestSet::with(&["J. Public"], &["twpa"], &[]));
    assert_eq!(p.matching, ["earlier", "J. Public", "twpa"]);
}

#[test]
fn test_interesting_iff_matching_nonempty() {
    let interests = InterestSet::with(&["J. Public"], &["amplifier"], &[]);
    let mut hit = paper(&["Jane Public"], "t", "a");
    let mut miss = paper(&["Jane Other"], "t", "a");
    apply_interests(&mut hit, &interests);
    apply_interests(&mut miss, &interests);
    assert!(hit.is_interesting());
    assert!(!miss.is_interesting());
}

#[test]
fn test_empty_interests_match_nothing() {
    let mut p = paper(&["Jane Public"], "amplifier", "a");
    apply_interests(&mut p, &InterestSet::default());
    assert!(p.matching.is_empty());
}
