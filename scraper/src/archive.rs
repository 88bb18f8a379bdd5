//! Walks the paginated report archive and drives report extraction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::Config;
use crate::dataset::{Dataset, FlushOutcome};
use crate::error::{FetchError, FlushError};
use crate::fetch::PageSource;
use crate::report::{extract_report, ReportOutcome};

/// The list holding one `<li>` card per archive result.
pub const LISTING_SELECTOR: &str = "ul.l-rhythm";

static WEEK_ENDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"week ending (\d{1,2} [A-Za-z]+ \d{4})").expect("invalid regex: week ending")
});

const STOP_POLL: Duration = Duration::from_millis(100);

/// A market snapshot link found on an archive page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub week_ending: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchivePage {
    /// The page has no listing container: there are no more results.
    End,
    Listing {
        /// Cards on the page, snapshot or not.
        items: usize,
        entries: Vec<ListingEntry>,
    },
}

/// Pull the "week ending <day> <month> <year>" label out of a link title.
pub fn week_ending_label(title: &str) -> Option<String> {
    WEEK_ENDING
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn parse_archive_page(html: &str) -> ArchivePage {
    let document = Html::parse_document(html);
    let listing_selector = Selector::parse(LISTING_SELECTOR).unwrap();
    let header_selector = Selector::parse("header").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let listing = match document.select(&listing_selector).next() {
        Some(listing) => listing,
        None => return ArchivePage::End,
    };

    // Direct children only; nested lists would count reports twice.
    let items: Vec<ElementRef> = listing
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .collect();

    let entries = items
        .iter()
        .filter_map(|item| {
            let header = item.select(&header_selector).next()?;
            let link = header.select(&link_selector).next()?;
            let href = link.value().attr("href")?;
            let title = link.text().collect::<String>();
            let week_ending = week_ending_label(&title)?;

            Some(ListingEntry {
                week_ending,
                href: href.to_string(),
            })
        })
        .collect();

    ArchivePage::Listing {
        items: items.len(),
        entries,
    }
}

/// How a walk ended. Only `Aborted` carries an error.
#[derive(Debug)]
pub enum WalkEnd {
    EndOfArchive { page: u32 },
    Interrupted { page: u32 },
    Aborted { page: u32, error: FetchError },
}

#[derive(Debug)]
pub struct WalkReport {
    pub end: WalkEnd,
    pub pages_visited: u32,
    pub reports_found: usize,
    pub reports_skipped: usize,
}

pub struct Walker<'a, S: PageSource + ?Sized> {
    source: &'a S,
    config: &'a Config,
    stop: &'a AtomicBool,
}

impl<'a, S: PageSource + ?Sized> Walker<'a, S> {
    pub fn new(source: &'a S, config: &'a Config, stop: &'a AtomicBool) -> Self {
        Walker {
            source,
            config,
            stop,
        }
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Visit archive pages in order until one has no listing, appending a
    /// record to `dataset` for every report that could be read.
    pub fn walk(&self, dataset: &mut Dataset) -> WalkReport {
        let mut page = self.config.start_page;
        let mut pages_visited = 0;
        let mut reports_found = 0;
        let mut reports_skipped = 0;

        let end = loop {
            if self.stopped() {
                break WalkEnd::Interrupted { page };
            }

            let url = self.config.listing_url(page);
            info!("--- Fetching archive page {} ---", page);

            let html = match self.source.fetch(&url) {
                Ok(html) => html,
                Err(error) => break WalkEnd::Aborted { page, error },
            };

            let (items, entries) = match parse_archive_page(&html) {
                ArchivePage::End => break WalkEnd::EndOfArchive { page },
                ArchivePage::Listing { items, entries } => (items, entries),
            };
            pages_visited += 1;
            info!("Found {} items on page {}", items, page);

            let mut interrupted = false;
            for entry in &entries {
                if self.stopped() {
                    interrupted = true;
                    break;
                }
                reports_found += 1;

                let report_url = self.config.report_url(&entry.href);
                match extract_report(self.source, &report_url, &entry.week_ending) {
                    ReportOutcome::Extracted(record) => dataset.push(record),
                    ReportOutcome::Skipped { .. } => reports_skipped += 1,
                }
            }
            if interrupted {
                break WalkEnd::Interrupted { page };
            }

            if entries.is_empty() {
                info!("No valid market snapshot reports on page {}, continuing", page);
            }

            page += 1;
            if !self.pause() {
                break WalkEnd::Interrupted { page };
            }
        };

        match &end {
            WalkEnd::EndOfArchive { page } => {
                info!("No more results found at page {}. Stopping.", page)
            }
            WalkEnd::Interrupted { page } => warn!("Process stopped by user at page {}", page),
            WalkEnd::Aborted { page, error } => {
                error!("Archive page {} could not be read: {}", page, error)
            }
        }

        WalkReport {
            end,
            pages_visited,
            reports_found,
            reports_skipped,
        }
    }

    /// Sleep for the politeness delay. Returns false if asked to stop meanwhile.
    fn pause(&self) -> bool {
        let deadline = Instant::now() + self.config.delay;
        loop {
            if self.stopped() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(STOP_POLL));
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub walk: WalkReport,
    pub records: usize,
    pub flush: FlushOutcome,
}

/// Walk the archive, then write whatever was collected exactly once,
/// however the walk ended.
pub fn run<S: PageSource + ?Sized>(
    source: &S,
    config: &Config,
    stop: &AtomicBool,
) -> Result<RunSummary, FlushError> {
    info!("---- Scraper started ----");
    let mut dataset = Dataset::new();
    let walk = Walker::new(source, config, stop).walk(&mut dataset);
    let records = dataset.len();
    let flush = dataset.flush(&config.output)?;

    Ok(RunSummary {
        walk,
        records,
        flush,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_ending_label() {
        assert_eq!(
            week_ending_label("Perth Market Snapshot for the week ending 7 June 2024"),
            Some("7 June 2024".to_string())
        );
        assert_eq!(
            week_ending_label("Perth market snapshot for the week ending 28 February 2019"),
            Some("28 February 2019".to_string())
        );
        assert_eq!(week_ending_label("REIWA welcomes new President"), None);
        assert_eq!(week_ending_label("Week ending 7 June 2024"), None);
    }

    #[test]
    fn test_page_without_listing_is_end() {
        let html = r#"<html><body><p>No results found.</p></body></html>"#;
        assert_eq!(parse_archive_page(html), ArchivePage::End);
    }

    #[test]
    fn test_empty_listing_is_not_end() {
        let html = r#"<ul class="l-rhythm"></ul>"#;
        assert_eq!(
            parse_archive_page(html),
            ArchivePage::Listing {
                items: 0,
                entries: vec![]
            }
        );
    }

    #[test]
    fn test_listing_filters_entries() {
        let html = r#"
        <ul class="l-rhythm">
            <li><header><a href="/news/snapshot-7-june-2024">Perth Market Snapshot for the week ending 7 June 2024</a></header></li>
            <li><header><a href="/news/new-president">REIWA welcomes new President</a></header></li>
            <li><div>No header here</div></li>
            <li><header><span>Perth Market Snapshot for the week ending 31 May 2024</span></header></li>
            <li>
                <header><a href="/news/snapshot-24-may-2024">Perth Market Snapshot for the week ending 24 May 2024</a></header>
                <ul class="l-rhythm">
                    <li><header><a href="/news/nested">Perth Market Snapshot for the week ending 1 January 2000</a></header></li>
                </ul>
            </li>
        </ul>
        "#;

        match parse_archive_page(html) {
            ArchivePage::Listing { items, entries } => {
                assert_eq!(items, 5);
                assert_eq!(
                    entries,
                    vec![
                        ListingEntry {
                            week_ending: "7 June 2024".to_string(),
                            href: "/news/snapshot-7-june-2024".to_string(),
                        },
                        ListingEntry {
                            week_ending: "24 May 2024".to_string(),
                            href: "/news/snapshot-24-may-2024".to_string(),
                        },
                    ]
                );
            }
            ArchivePage::End => panic!("expected a listing"),
        }
    }
}
