pub mod archive;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod report;
pub mod rules;

// Scenario tests with fixtures and a fake site
#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::archive::{
    parse_archive_page, run, week_ending_label, ArchivePage, ListingEntry, RunSummary, WalkEnd,
    WalkReport, Walker,
};
pub use crate::config::Config;
pub use crate::dataset::{Dataset, FlushOutcome, ReportRecord};
pub use crate::error::{FetchError, FlushError, SkipReason};
pub use crate::fetch::{fetch_html, HttpPageSource, PageSource};
pub use crate::report::{extract_report, parse_report, ReportOutcome};
