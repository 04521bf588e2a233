//! Outcome of one fetch cycle.

use chrono::NaiveDate;
use serde::Serialize;

use super::Paper;

/// Whether the cycle had anything to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SourceStatus {
    /// Papers were retrieved (possibly zero of them).
    Available,
    /// Nothing usable this cycle; the reason is kept for logs and replies.
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
}

/// The papers seen in one cycle and the interesting subset.
///
/// Replaced wholesale by every new cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResult {
    /// Date the cycle ran on.
    pub run_date: NaiveDate,

    /// Every record retrieved, after matching.
    pub candidates: Vec<Paper>,

    /// Records with a non-empty matching set, in source order.
    pub interesting: Vec<Paper>,

    /// Source availability.
    pub source: SourceStatus,
}

impl DailyResult {
    /// Split matched candidates into a result.
    #[must_use]
    pub fn from_candidates(run_date: NaiveDate, candidates: Vec<Paper>) -> Self {
        let interesting = candidates.iter().filter(|p| p.is_interesting()).cloned().collect();
        Self { run_date, candidates, interesting, source: SourceStatus::Available }
    }

    /// Zero-candidate result for a cycle without a source.
    #[must_use]
    pub fn empty(run_date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            run_date,
            candidates: Vec::new(),
            interesting: Vec::new(),
            source: SourceStatus::Unavailable { reason: reason.into() },
        }
    }

    /// Number of records analyzed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// The n-th interesting paper, counting from 1.
    #[must_use]
    pub fn paper(&self, n: usize) -> Option<&Paper> {
        n.checked_sub(1).and_then(|i| self.interesting.get(i))
    }

    /// True when the source was missing this cycle.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self.source, SourceStatus::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, matching: &[&str]) -> Paper {
        let mut p = Paper::new(id, "t", vec!["A B".into()], "quant-ph", "a", "l");
        p.matching = matching.iter().map(|m| (*m).to_string()).collect();
        p
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_from_candidates_keeps_interesting_in_order() {
        let result = DailyResult::from_candidates(
            day(),
            vec![paper("1", &["x"]), paper("2", &[]), paper("3", &["y"])],
        );
        assert_eq!(result.total(), 3);
        let ids: Vec<_> = result.interesting.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert!(!result.is_unavailable());
    }

    #[test]
    fn test_paper_index_is_one_based() {
        let result = DailyResult::from_candidates(day(), vec![paper("1", &["x"])]);
        assert_eq!(result.paper(1).map(|p| p.id.as_str()), Some("1"));
        assert!(result.paper(0).is_none());
        assert!(result.paper(2).is_none());
    }

    #[test]
    fn test_empty_result() {
        let result = DailyResult::empty(day(), "no digest");
        assert_eq!(result.total(), 0);
        assert!(result.is_unavailable());
    }
}
