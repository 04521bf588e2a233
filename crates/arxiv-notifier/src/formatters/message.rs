//! Chat message texts.

use crate::models::{DailyResult, InterestSet, Paper, SourceStatus};

/// Header line of a cycle notification.
#[must_use]
pub fn summary_message(result: &DailyResult) -> String {
    let mut output = format!(
        "(arXivBot update of the {})\tOf {} new papers, {} were found interesting",
        result.run_date.format("%d/%m/%Y"),
        result.total(),
        result.interesting.len()
    );
    if let SourceStatus::Unavailable { reason } = &result.source {
        output.push_str(&format!(" ({reason})"));
    }
    output
}

/// Numbered list of interesting papers with what matched; empty when none.
#[must_use]
pub fn listing_message(result: &DailyResult) -> String {
    let mut output = String::new();

    for (i, paper) in result.interesting.iter().enumerate() {
        output.push_str(&format!("\n{}. {}\n[{}]", i + 1, paper, paper.matching.join(", ")));
    }

    output
}

/// Title and abstract of one paper.
#[must_use]
pub fn abstract_message(paper: &Paper) -> String {
    format!("{}\n\n{}", paper.title, paper.r#abstract)
}

/// Current interest list.
#[must_use]
pub fn interests_message(interests: &InterestSet) -> String {
    format!("Current queries:\n{interests}")
}

/// Command overview.
#[must_use]
pub fn help_message(prefix: &str) -> String {
    [
        ("fetch", "fetch new papers now"),
        ("abstract N", "show the abstract of paper N"),
        ("query", "show the current queries"),
        ("add_queries CAT K1 K2...", "add keywords to authors, keywords or categories"),
        ("remove_queries K1 K2...", "remove keywords from every category"),
        ("clear_query", "remove all queries"),
        ("max_results N", "change how many search results are fetched"),
    ]
    .iter()
    .map(|(usage, what)| format!("{prefix}{usage}: {what}"))
    .collect::<Vec<_>>()
    .join("\n")
}
