//! Interest list: the configured authors, keywords and categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Fixed set of interest categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Author names.
    Authors,
    /// Title/abstract keywords.
    Keywords,
    /// arXiv categories (search path only).
    Categories,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Authors, Self::Keywords, Self::Categories];

    /// Name used in commands and in the interest file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authors => "authors",
            Self::Keywords => "keywords",
            Self::Categories => "categories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CommandError::UnknownCategory(s.to_string()))
    }
}

/// On-disk shape; unknown keys are rejected.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InterestFile {
    authors: Vec<String>,
    keywords: Vec<String>,
    categories: Vec<String>,
}

/// Interest criteria per category, each list ordered and duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InterestFile")]
pub struct InterestSet {
    authors: Vec<String>,
    keywords: Vec<String>,
    categories: Vec<String>,
}

impl From<InterestFile> for InterestSet {
    fn from(file: InterestFile) -> Self {
        let mut set = Self::default();
        set.add(Category::Authors, file.authors);
        set.add(Category::Keywords, file.keywords);
        set.add(Category::Categories, file.categories);
        set
    }
}

impl InterestSet {
    /// Build a set from explicit lists (duplicates are dropped).
    #[must_use]
    pub fn with(authors: &[&str], keywords: &[&str], categories: &[&str]) -> Self {
        let owned = |v: &[&str]| v.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        Self::from(InterestFile {
            authors: owned(authors),
            keywords: owned(keywords),
            categories: owned(categories),
        })
    }

    /// Entries of one category.
    #[must_use]
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Authors => &self.authors,
            Category::Keywords => &self.keywords,
            Category::Categories => &self.categories,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Authors => &mut self.authors,
            Category::Keywords => &mut self.keywords,
            Category::Categories => &mut self.categories,
        }
    }

    /// Configured author names.
    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    /// Configured keywords.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Configured arXiv categories.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Append values not yet present, keeping order. Returns what was inserted.
    pub fn add<I, S>(&mut self, category: Category, values: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.get_mut(category);
        let mut inserted = Vec::new();
        for value in values {
            let value: String = value.into();
            let value = value.trim();
            if value.is_empty() || list.iter().any(|v| v == value) {
                continue;
            }
            list.push(value.to_string());
            inserted.push(value.to_string());
        }
        inserted
    }

    /// Remove every occurrence of each value from every category.
    pub fn remove<S: AsRef<str>>(&mut self, values: &[S]) -> usize {
        let mut removed = 0;
        for category in Category::ALL {
            let list = self.get_mut(category);
            let before = list.len();
            list.retain(|v| !values.iter().any(|r| r.as_ref() == v.as_str()));
            removed += before - list.len();
        }
        removed
    }

    /// Empty every category.
    pub fn clear(&mut self) {
        for category in Category::ALL {
            self.get_mut(category).clear();
        }
    }

    /// True when no category holds any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

impl fmt::Display for InterestSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, category) in Category::ALL.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let values = self.get(*category);
            if values.is_empty() {
                write!(f, "{category}: (none)")?;
            } else {
                write!(f, "{category}: {}", values.join(", "))?;
            }
        }
        Ok(())
    }
}
