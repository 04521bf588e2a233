//! Interest matching.
//!
//! Both passes only append to `Paper::matching`, in interest-list order,
//! using the interest string as configured.

use crate::models::{InterestSet, Paper};

/// Comparison key for author names: first initial plus surname.
///
/// A one-word name carries no initial and matches on surname alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorKey {
    initial: Option<char>,
    surname: String,
}

impl AuthorKey {
    /// Derive the key of a full name; `None` for blank names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        let surname = tokens.last()?.to_lowercase();
        let initial = if tokens.len() > 1 {
            tokens[0].chars().next().and_then(|c| c.to_lowercase().next())
        } else {
            None
        };
        Some(Self { initial, surname })
    }

    /// Whether an interest key accepts a paper author key.
    #[must_use]
    pub fn accepts(&self, author: &Self) -> bool {
        if self.surname != author.surname {
            return false;
        }
        match self.initial {
            Some(initial) => author.initial == Some(initial),
            None => true,
        }
    }
}

/// Append every interest author whose key matches one of the paper's authors.
pub fn match_authors<S: AsRef<str>>(paper: &mut Paper, authors_of_interest: &[S]) {
    let paper_keys: Vec<AuthorKey> =
        paper.authors.iter().filter_map(|a| AuthorKey::from_name(a)).collect();

    for interest in authors_of_interest {
        let interest = interest.as_ref();
        let Some(key) = AuthorKey::from_name(interest) else {
            continue;
        };
        if paper_keys.iter().any(|k| key.accepts(k)) {
            paper.matching.push(interest.to_string());
        }
    }
}

/// Append every keyword contained (case-insensitively) in title or abstract.
pub fn match_keywords<S: AsRef<str>>(paper: &mut Paper, keywords_of_interest: &[S]) {
    let title = paper.title.to_lowercase();
    let r#abstract = paper.r#abstract.to_lowercase();

    for keyword in keywords_of_interest {
        let keyword = keyword.as_ref();
        let needle = keyword.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        if title.contains(&needle) || r#abstract.contains(&needle) {
            paper.matching.push(keyword.to_string());
        }
    }
}

/// Run the authors pass, then the keywords pass.
pub fn apply_interests(paper: &mut Paper, interests: &InterestSet) {
    match_authors(paper, interests.authors());
    match_keywords(paper, interests.keywords());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(authors: &[&str], title: &str, abs: &str) -> Paper {
        Paper::new(
            "2401.00001",
            title,
            authors.iter().map(|a| (*a).to_string()).collect(),
            "quant-ph",
            abs,
            "https://arxiv.org/abs/2401.00001",
        )
    }

    #[test]
    fn test_author_key() {
        let key = AuthorKey::from_name("Jane Q. Public").unwrap();
        assert_eq!(key, AuthorKey::from_name("J. Public").unwrap());
        assert_eq!(key, AuthorKey::from_name("jane public").unwrap());
        assert_ne!(key, AuthorKey::from_name("Mary Public").unwrap());
        assert!(AuthorKey::from_name("   ").is_none());
    }

    #[test]
    fn test_author_initial_and_surname() {
        let mut p = paper(&["Jane Quincy Public", "John Doe"], "t", "a");
        match_authors(&mut p, &["Jane Q. Public"]);
        assert_eq!(p.matching, ["Jane Q. Public"]);

        let mut p = paper(&["Mary Public", "Jane Private"], "t", "a");
        match_authors(&mut p, &["Jane Q. Public"]);
        assert!(p.matching.is_empty());
    }

    #[test]
    fn test_surname_only_interest() {
        let mut p = paper(&["Andrea Giachero"], "t", "a");
        match_authors(&mut p, &["Giachero"]);
        assert_eq!(p.matching, ["Giachero"]);
    }

    #[test]
    fn test_duplicate_interests_not_filtered() {
        let mut p = paper(&["Jane Public"], "t", "a");
        match_authors(&mut p, &["J. Public", "J. Public"]);
        assert_eq!(p.matching.len(), 2);
    }

    #[test]
    fn test_keyword_case_insensitive_substring() {
        let mut p = paper(&["A B"], "Readout chains", "...Qubits were coupled to a subTWPAdomain");
        match_keywords(&mut p, &["qubit", "TWPA", "RFSoC"]);
        assert_eq!(p.matching, ["qubit", "TWPA"]);
    }

    #[test]
    fn test_apply_interests_order() {
        let interests = InterestSet::with(&["J. Public"], &["amplifier"], &["quant-ph"]);
        let mut p = paper(&["Jane Public"], "An amplifier", "text");
        apply_interests(&mut p, &interests);
        assert_eq!(p.matching, ["J. Public", "amplifier"]);
    }

    #[test]
    fn test_categories_are_not_matched() {
        let interests = InterestSet::with(&[], &[], &["quant-ph"]);
        let mut p = paper(&["A B"], "t", "a");
        apply_interests(&mut p, &interests);
        assert!(!p.is_interesting());
    }
}
