//! Data model: papers, interest lists and cycle results.
//!
//! `Paper` is the single shape produced by both the digest parser and the
//! search API client, so one matcher serves both sources.

mod interests;
mod paper;
mod result;

pub use interests::{Category, InterestSet};
pub use paper::Paper;
pub use result::{DailyResult, SourceStatus};
