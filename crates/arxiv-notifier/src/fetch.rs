//! Fetch orchestrator: source -> matcher -> daily result.
//!
//! A cycle never fails. A missing digest, a transport fault or a timeout all
//! produce an empty result so the notification still goes out.

use std::time::Duration;

use chrono::NaiveDate;

use crate::error::SourceError;
use crate::matcher::apply_interests;
use crate::models::{DailyResult, InterestSet};
use crate::sources::{FetchRequest, PaperSource};

/// Run one fetch cycle against `source`.
pub async fn run_cycle(
    source: &dyn PaperSource,
    interests: &InterestSet,
    today: NaiveDate,
    max_results: usize,
    timeout: Duration,
) -> DailyResult {
    let request = FetchRequest { interests, today, max_results };

    let outcome = tokio::time::timeout(timeout, source.fetch(request))
        .await
        .unwrap_or_else(|_| Err(SourceError::Timeout(timeout)));

    let papers = match outcome {
        Ok(Some(papers)) => papers,
        Ok(None) => {
            tracing::info!(source = source.name(), "No source available this cycle");
            return DailyResult::empty(today, "no new papers were published");
        }
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "Fetch failed");
            return DailyResult::empty(today, format!("fetch failed: {e}"));
        }
    };

    let mut candidates = papers;
    for paper in &mut candidates {
        apply_interests(paper, interests);
    }

    let result = DailyResult::from_candidates(today, candidates);
    tracing::info!(
        analyzed = result.total(),
        interesting = result.interesting.len(),
        "Analyzed {}, {} are interesting",
        result.total(),
        result.interesting.len()
    );
    result
}
