//! Paper record shared by the digest and search paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A newly announced arXiv paper.
///
/// `matching` starts empty and is only filled by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// arXiv identifier (e.g. "2310.01234").
    pub id: String,

    /// Single-line title.
    pub title: String,

    /// Author full names in order of appearance.
    pub authors: Vec<String>,

    /// Raw category string (e.g. "quant-ph cond-mat.supr-con").
    pub categories: String,

    /// Single-line abstract.
    pub r#abstract: String,

    /// Link to the abstract page.
    pub link: String,

    /// Interest criteria that matched this paper.
    #[serde(default)]
    pub matching: Vec<String>,
}

impl Paper {
    /// Create a paper with an empty matching set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        authors: Vec<String>,
        categories: impl Into<String>,
        r#abstract: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors,
            categories: categories.into(),
            r#abstract: r#abstract.into(),
            link: link.into(),
            matching: Vec::new(),
        }
    }

    /// True once at least one interest criterion matched.
    #[must_use]
    pub fn is_interesting(&self) -> bool {
        !self.matching.is_empty()
    }

    /// First author as "J Public", if any.
    #[must_use]
    pub fn first_author_short(&self) -> Option<String> {
        let mut tokens = self.authors.first()?.split_whitespace();
        let first = tokens.next()?;
        let initial = first.chars().next()?;
        let surname = tokens.next_back().unwrap_or(first);
        Some(format!("{initial} {surname}"))
    }
}

impl fmt::Display for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_author_short() {
            Some(author) if self.authors.len() > 1 => {
                write!(f, "{}, {author} et al. ({})", self.title, self.link)
            }
            Some(author) => write!(f, "{}, {author} ({})", self.title, self.link),
            None => write!(f, "{} ({})", self.title, self.link),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(authors: &[&str]) -> Paper {
        Paper::new(
            "2310.00001",
            "Quantum limited amplifiers",
            authors.iter().map(|a| (*a).to_string()).collect(),
            "quant-ph",
            "We study amplifiers.",
            "https://arxiv.org/abs/2310.00001",
        )
    }

    #[test]
    fn test_new_paper_has_empty_matching() {
        let p = paper(&["Jane Q. Public"]);
        assert!(p.matching.is_empty());
        assert!(!p.is_interesting());
    }

    #[test]
    fn test_display_single_author() {
        let p = paper(&["Jane Q. Public"]);
        assert_eq!(
            p.to_string(),
            "Quantum limited amplifiers, J Public (https://arxiv.org/abs/2310.00001)"
        );
    }

    #[test]
    fn test_display_multiple_authors() {
        let p = paper(&["Jane Q. Public", "John Doe"]);
        assert!(p.to_string().contains("J Public et al."));
    }

    #[test]
    fn test_display_without_authors() {
        let p = paper(&[]);
        assert_eq!(p.to_string(), "Quantum limited amplifiers (https://arxiv.org/abs/2310.00001)");
    }

    #[test]
    fn test_first_author_single_token() {
        let p = paper(&["Giachero"]);
        assert_eq!(p.first_author_short().as_deref(), Some("G Giachero"));
    }
}
